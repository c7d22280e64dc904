use embedded_hal::{
    delay::DelayNs,
    digital::OutputPin,
    spi::{Error as SpiErrorTrait, ErrorKind, ErrorType, Operation, SpiBus, SpiDevice},
};
use embedded_sdmmc::{
    BlockDevice, Mode, RawDirectory, RawFile, RawVolume, SdCard, SdCardError, TimeSource,
    Timestamp, VolumeIdx, VolumeManager,
};
use lapse_core::font::ByteStore;
use log::{info, warn};

/// Fixed timestamp source; files are only ever opened read-only.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedTimeSource;

impl TimeSource for FixedTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        // 2026-01-01 00:00:00
        Timestamp {
            year_since_1970: 56,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// SD bring-up error details.
#[derive(Debug)]
pub enum SdProbeError<BusErr, CsErr>
where
    BusErr: core::fmt::Debug,
    CsErr: core::fmt::Debug,
{
    ChipSelect(CsErr),
    Spi(BusErr),
    Card(SdCardError),
}

#[derive(Debug)]
pub enum ExclusiveSpiError<BusErr, CsErr>
where
    BusErr: core::fmt::Debug,
    CsErr: core::fmt::Debug,
{
    Bus(BusErr),
    Cs(CsErr),
    DelayNotSupported,
}

impl<BusErr, CsErr> SpiErrorTrait for ExclusiveSpiError<BusErr, CsErr>
where
    BusErr: core::fmt::Debug,
    CsErr: core::fmt::Debug,
{
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Sole-owner `SpiDevice` over a bus and chip-select pin.
pub struct ExclusiveSpiDevice<BUS, CS>
where
    BUS: SpiBus<u8>,
    CS: OutputPin,
{
    bus: BUS,
    cs: CS,
}

impl<BUS, CS> ExclusiveSpiDevice<BUS, CS>
where
    BUS: SpiBus<u8>,
    CS: OutputPin,
{
    pub fn new(bus: BUS, cs: CS) -> Self {
        Self { bus, cs }
    }
}

impl<BUS, CS> ErrorType for ExclusiveSpiDevice<BUS, CS>
where
    BUS: SpiBus<u8>,
    CS: OutputPin,
    BUS::Error: core::fmt::Debug,
    CS::Error: core::fmt::Debug,
{
    type Error = ExclusiveSpiError<BUS::Error, CS::Error>;
}

impl<BUS, CS> SpiDevice<u8> for ExclusiveSpiDevice<BUS, CS>
where
    BUS: SpiBus<u8>,
    CS: OutputPin,
    BUS::Error: core::fmt::Debug,
    CS::Error: core::fmt::Debug,
{
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        if operations
            .iter()
            .any(|op| matches!(op, Operation::DelayNs(_)))
        {
            return Err(ExclusiveSpiError::DelayNotSupported);
        }

        self.cs.set_low().map_err(ExclusiveSpiError::Cs)?;

        let op_result = (|| {
            for operation in operations {
                match operation {
                    Operation::Read(buf) => self.bus.read(buf).map_err(ExclusiveSpiError::Bus)?,
                    Operation::Write(buf) => self.bus.write(buf).map_err(ExclusiveSpiError::Bus)?,
                    Operation::Transfer(read, write) => self
                        .bus
                        .transfer(read, write)
                        .map_err(ExclusiveSpiError::Bus)?,
                    Operation::TransferInPlace(buf) => self
                        .bus
                        .transfer_in_place(buf)
                        .map_err(ExclusiveSpiError::Bus)?,
                    Operation::DelayNs(_) => return Err(ExclusiveSpiError::DelayNotSupported),
                }
            }
            self.bus.flush().map_err(ExclusiveSpiError::Bus)?;
            Ok(())
        })();

        let cs_result = self.cs.set_high().map_err(ExclusiveSpiError::Cs);
        match (op_result, cs_result) {
            (Err(e), _) => Err(e),
            (Ok(_), Err(e)) => Err(e),
            (Ok(_), Ok(_)) => Ok(()),
        }
    }
}

pub type SpiSdCard<BUS, CS, DELAY> = SdCard<ExclusiveSpiDevice<BUS, CS>, DELAY>;

/// Clocks the card into SPI mode and reads its capacity.
///
/// Returns the initialised card and its size in bytes.
pub fn open_sd_card<BUS, CS, DELAY>(
    mut bus: BUS,
    mut cs: CS,
    delay: DELAY,
) -> Result<(SpiSdCard<BUS, CS, DELAY>, u64), SdProbeError<BUS::Error, CS::Error>>
where
    BUS: SpiBus<u8>,
    CS: OutputPin,
    DELAY: DelayNs,
    BUS::Error: core::fmt::Debug,
    CS::Error: core::fmt::Debug,
{
    cs.set_high().map_err(SdProbeError::ChipSelect)?;

    // SD SPI init requires >=74 clock cycles with CS deasserted.
    let preclock = [0xFFu8; 10];
    bus.write(&preclock).map_err(SdProbeError::Spi)?;

    let sd_card = SdCard::new(ExclusiveSpiDevice::new(bus, cs), delay);
    let card_size_bytes = sd_card.num_bytes().map_err(SdProbeError::Card)?;
    info!("sd: card ready ({} MiB)", card_size_bytes / (1024 * 1024));

    Ok((sd_card, card_size_bytes))
}

#[derive(Debug)]
pub enum SdStoreError<E>
where
    E: core::fmt::Debug,
{
    Filesystem(embedded_sdmmc::Error<E>),
    /// Path does not name a file.
    BadPath,
    /// Offset does not fit the FAT 32-bit file size.
    OffsetOutOfRange,
}

impl<E> From<embedded_sdmmc::Error<E>> for SdStoreError<E>
where
    E: core::fmt::Debug,
{
    fn from(err: embedded_sdmmc::Error<E>) -> Self {
        Self::Filesystem(err)
    }
}

/// Read-only, path-addressed access to the first FAT volume on the card.
///
/// Every call walks the path from the root and closes what it opened, so no
/// handles outlive a single operation.
pub struct SdByteStore<D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    volume_mgr: VolumeManager<D, T>,
    volume: Option<RawVolume>,
}

impl<D, T> SdByteStore<D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    pub fn new(device: D, time_source: T) -> Self {
        Self {
            volume_mgr: VolumeManager::new(device, time_source),
            volume: None,
        }
    }

    /// Opens volume 0 if it is not open yet.
    pub fn mount(&mut self) -> Result<RawVolume, SdStoreError<D::Error>> {
        if let Some(volume) = self.volume {
            return Ok(volume);
        }

        let volume = self.volume_mgr.open_raw_volume(VolumeIdx(0))?;
        info!("sd: volume mounted");
        self.volume = Some(volume);
        Ok(volume)
    }

    pub fn is_mounted(&self) -> bool {
        self.volume.is_some()
    }

    /// Closes the volume; the next access mounts it again.
    pub fn unmount(&mut self) {
        if let Some(volume) = self.volume.take()
            && let Err(err) = self.volume_mgr.close_volume(volume)
        {
            warn!("sd: close volume failed: {err:?}");
        }
    }

    fn open_parent<'p>(
        &mut self,
        path: &'p str,
    ) -> Result<(RawDirectory, &'p str), SdStoreError<D::Error>> {
        let path = path.trim_start_matches('/');
        let (dirs, name) = match path.rsplit_once('/') {
            Some((dirs, name)) => (dirs, name),
            None => ("", path),
        };
        if name.is_empty() {
            return Err(SdStoreError::BadPath);
        }

        let volume = self.mount()?;
        let mut dir = self.volume_mgr.open_root_dir(volume)?;

        for component in dirs.split('/').filter(|c| !c.is_empty()) {
            let next = self.volume_mgr.open_dir(dir, component);
            self.close_dir(dir);
            dir = next?;
        }

        Ok((dir, name))
    }

    fn close_dir(&mut self, dir: RawDirectory) {
        if let Err(err) = self.volume_mgr.close_dir(dir) {
            warn!("sd: close dir failed: {err:?}");
        }
    }

    fn close_file(&mut self, file: RawFile) {
        if let Err(err) = self.volume_mgr.close_file(file) {
            warn!("sd: close file failed: {err:?}");
        }
    }

    /// Opens `path` read-only, runs `op`, then closes everything it opened.
    fn with_file<R>(
        &mut self,
        path: &str,
        op: impl FnOnce(&mut VolumeManager<D, T>, RawFile) -> Result<R, SdStoreError<D::Error>>,
    ) -> Result<R, SdStoreError<D::Error>> {
        let (dir, name) = self.open_parent(path)?;
        let file = self.volume_mgr.open_file_in_dir(dir, name, Mode::ReadOnly);
        self.close_dir(dir);
        let file = file?;

        let result = op(&mut self.volume_mgr, file);
        self.close_file(file);
        result
    }
}

impl<D, T> ByteStore for SdByteStore<D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    type Error = SdStoreError<D::Error>;

    fn exists(&mut self, path: &str) -> bool {
        match self.with_file(path, |_, _| Ok(())) {
            Ok(()) => true,
            Err(SdStoreError::Filesystem(embedded_sdmmc::Error::NotFound)) => false,
            Err(err) => {
                warn!("sd: lookup of {path} failed: {err:?}");
                false
            }
        }
    }

    fn file_size(&mut self, path: &str) -> Result<u64, Self::Error> {
        self.with_file(path, |mgr, file| Ok(mgr.file_length(file)? as u64))
    }

    fn read_at(&mut self, path: &str, offset: u64, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let offset = u32::try_from(offset).map_err(|_| SdStoreError::OffsetOutOfRange)?;

        self.with_file(path, |mgr, file| {
            mgr.file_seek_from_start(file, offset)?;
            let mut total = 0usize;
            while total < buf.len() {
                let read_now = mgr.read(file, &mut buf[total..])?;
                if read_now == 0 {
                    break;
                }
                total = total.saturating_add(read_now);
            }
            Ok(total)
        })
    }
}
