//! Persisted font tuning and its on-flash record format.

use heapless::String;

use crate::raster::FontScale;

/// Longest font path that fits in the record.
pub const FONT_PATH_CAPACITY: usize = 48;
/// Font file looked up on the card when nothing is stored.
pub const DEFAULT_FONT_PATH: &str = "/FONT/GB2312.FON";

pub const RECORD_LEN: usize = 64;
const RECORD_MAGIC: u32 = 0x3146_434C; // "LCF1"
const RECORD_VERSION: u8 = 1;
const PATH_START: usize = 10;
const CHECKSUM_START: usize = RECORD_LEN - 4;

/// User-tunable font settings that should survive reboot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FontSettings {
    pub font_path: String<FONT_PATH_CAPACITY>,
    /// Chinese glyph scale in thousandths.
    pub scale_permille: u16,
    /// Shift applied to every glyph index of the loaded font.
    pub index_offset: i16,
}

impl Default for FontSettings {
    fn default() -> Self {
        let mut font_path = String::new();
        let _ = font_path.push_str(DEFAULT_FONT_PATH);
        Self {
            font_path,
            scale_permille: FontScale::DEFAULT.to_permille(),
            index_offset: 0,
        }
    }
}

impl FontSettings {
    pub fn font_scale(&self) -> FontScale {
        FontScale::from_permille(self.scale_permille)
    }

    pub fn set_font_scale(&mut self, scale: FontScale) {
        self.scale_permille = scale.to_permille();
    }

    /// Replaces the font path; `false` if it does not fit.
    pub fn set_font_path(&mut self, path: &str) -> bool {
        let mut next = String::new();
        if next.push_str(path).is_err() {
            return false;
        }
        self.font_path = next;
        true
    }
}

/// Abstract settings persistence backend.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<FontSettings>, Self::Error>;
    fn save(&mut self, settings: &FontSettings) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RecordError {
    Corrupted,
}

/// FNV-1a over `bytes`.
pub fn checksum32(bytes: &[u8]) -> u32 {
    let mut hash = 0x811C_9DC5u32;
    for b in bytes {
        hash ^= *b as u32;
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

pub fn encode_record(settings: &FontSettings) -> [u8; RECORD_LEN] {
    let mut buf = [0xFFu8; RECORD_LEN];
    let path = settings.font_path.as_bytes();

    buf[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
    buf[4] = RECORD_VERSION;
    buf[5] = path.len() as u8;
    buf[6..8].copy_from_slice(&settings.scale_permille.to_le_bytes());
    buf[8..10].copy_from_slice(&settings.index_offset.to_le_bytes());
    buf[PATH_START..PATH_START + path.len()].copy_from_slice(path);

    let checksum = checksum32(&buf[..CHECKSUM_START]);
    buf[CHECKSUM_START..].copy_from_slice(&checksum.to_le_bytes());
    buf
}

/// Parses a stored record.
///
/// Erased flash, foreign magic, and unknown versions read as "nothing
/// stored"; a record that claims to be ours but fails validation is an error.
pub fn decode_record(buf: &[u8; RECORD_LEN]) -> Result<Option<FontSettings>, RecordError> {
    if buf.iter().all(|b| *b == 0xFF) {
        return Ok(None);
    }

    let magic = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    if magic != RECORD_MAGIC || buf[4] != RECORD_VERSION {
        return Ok(None);
    }

    let expected = u32::from_le_bytes([
        buf[CHECKSUM_START],
        buf[CHECKSUM_START + 1],
        buf[CHECKSUM_START + 2],
        buf[CHECKSUM_START + 3],
    ]);
    if checksum32(&buf[..CHECKSUM_START]) != expected {
        return Err(RecordError::Corrupted);
    }

    let path_len = buf[5] as usize;
    if path_len > FONT_PATH_CAPACITY {
        return Err(RecordError::Corrupted);
    }
    let path = core::str::from_utf8(&buf[PATH_START..PATH_START + path_len])
        .map_err(|_| RecordError::Corrupted)?;

    let mut settings = FontSettings {
        font_path: String::new(),
        scale_permille: u16::from_le_bytes([buf[6], buf[7]]),
        index_offset: i16::from_le_bytes([buf[8], buf[9]]),
    };
    if !settings.set_font_path(path) {
        return Err(RecordError::Corrupted);
    }
    settings.set_font_scale(settings.font_scale());

    Ok(Some(settings))
}
