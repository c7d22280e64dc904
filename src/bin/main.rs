#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::Timer;
use esp_hal::{
    Blocking,
    clock::CpuClock,
    delay::Delay,
    gpio::{Level, Output, OutputConfig},
    i2c::master::{Config as I2cConfig, I2c},
    spi::master::Spi,
    time::{Instant, Rate},
    timer::timg::TimerGroup,
};
use lapse_core::{
    font::{CachedGlyphSource, FontError, FontInfo, FontStore},
    settings::{DEFAULT_FONT_PATH, FontSettings, SettingsStore},
    text::FontRenderContext,
    ui::{Screen, ScreenRenderer, SystemInfoView, TimelapseStatusView, strings},
};
use lapse_hal_esp32s3::{
    platform::display::OledDisplay,
    storage::{
        flash_settings::FlashSettingsStore,
        sd_spi::{FixedTimeSource, SdByteStore, SpiSdCard, open_sd_card},
    },
};
use log::{LevelFilter, info, warn};

use settings_sync::SettingsSyncState;

#[path = "main/settings_sync.rs"]
mod settings_sync;

// OLED on I2C0: SDA=GPIO2, SCL=GPIO3.
const OLED_I2C_HZ: u32 = 400_000;
const OLED_CONTRAST: u8 = ssd1306::protocol::DEFAULT_CONTRAST;
// SD card in SPI mode: SCK=GPIO39, MOSI(CMD)=GPIO38, MISO(D0)=GPIO40, CS(D3)=GPIO41.
const SD_SPI_HZ: u32 = 1_000_000;

const GLYPH_CACHE_SLOTS: usize = 16;
const SETTINGS_SAVE_DEBOUNCE_MS: u64 = 1_500;
const BOOT_MESSAGE_MS: u64 = 1_500;
const STATUS_REFRESH_MS: u64 = 1_000;
const SCREEN_ROTATE_MS: u64 = 5_000;
const DEFAULT_INTERVAL_S: u32 = 10;
// TODO: feed from the battery ADC on GPIO1 once power sampling lands.
const BATTERY_PLACEHOLDER_PCT: u8 = 100;

type SdSpi = Spi<'static, Blocking>;
type SdStore = SdByteStore<SpiSdCard<SdSpi, Output<'static>, Delay>, FixedTimeSource>;
type Glyphs = Option<CachedGlyphSource<FontStore<SdStore>, GLYPH_CACHE_SLOTS>>;
type Oled = OledDisplay<I2c<'static, Blocking>>;

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

async fn halt(reason: &str) -> ! {
    warn!("boot: halted: {reason}");
    loop {
        Timer::after_secs(1).await;
    }
}

fn show(display: &mut Oled, ctx: &mut FontRenderContext<Glyphs>, screen: &Screen<'_>) {
    ScreenRenderer::new().render(screen, ctx, display.frame_mut());
    if let Err(err) = display.present() {
        warn!("display: flush failed: {err:?}");
    }
}

/// Loads the configured font, falling back to the default path.
///
/// On fallback the path that worked is written back into `settings`.
fn load_font(fonts: &mut FontStore<SdStore>, settings: &mut FontSettings) -> Result<(), FontError> {
    let configured = fonts.load(settings.font_path.as_str()).map(|_| ());
    if configured.is_ok() || settings.font_path.as_str() == DEFAULT_FONT_PATH {
        return configured;
    }

    warn!(
        "font: {} unusable ({:?}), trying {DEFAULT_FONT_PATH}",
        settings.font_path, configured
    );
    fonts.load(DEFAULT_FONT_PATH)?;
    settings.set_font_path(DEFAULT_FONT_PATH);
    Ok(())
}

fn font_info(ctx: &FontRenderContext<Glyphs>) -> Option<FontInfo> {
    ctx.glyphs()
        .as_ref()
        .and_then(|cache| cache.inner().info())
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    esp_println::logger::init_logger(LevelFilter::Info);
    esp_println::println!("boot: lapsecam starting");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 65536);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let i2c_config = I2cConfig::default().with_frequency(Rate::from_hz(OLED_I2C_HZ));
    let i2c = match I2c::new(peripherals.I2C0, i2c_config) {
        Ok(i2c) => i2c
            .with_sda(peripherals.GPIO2)
            .with_scl(peripherals.GPIO3),
        Err(err) => {
            warn!("display: i2c config rejected: {err:?}");
            halt("no display bus").await
        }
    };

    let mut display = match OledDisplay::probe(i2c, OLED_CONTRAST) {
        Ok(display) => display,
        Err((_, err)) => {
            warn!("display: init failed: {err:?}");
            halt("no display").await
        }
    };
    info!("display: ready at {:#04x}", display.address());

    let mut settings_store = match FlashSettingsStore::new() {
        Ok(store) => Some(store),
        Err(err) => {
            warn!("settings: flash unavailable: {err:?}");
            None
        }
    };
    let stored = match settings_store.as_mut().map(|store| store.load()) {
        Some(Ok(stored)) => stored,
        Some(Err(err)) => {
            warn!("settings: load failed: {err:?}");
            None
        }
        None => None,
    };
    let mut settings = stored.clone().unwrap_or_default();
    let mut settings_sync = SettingsSyncState::new(stored);

    // Nothing is loaded yet, so the boot notice falls back to ASCII.
    let mut ctx: FontRenderContext<Glyphs> = FontRenderContext::with_scale(None, settings.font_scale());
    show(
        &mut display,
        &mut ctx,
        &Screen::message(b"Initializing...", None, None),
    );

    let sd_cs = Output::new(peripherals.GPIO41, Level::High, OutputConfig::default());
    let sd_spi_config = esp_hal::spi::master::Config::default()
        .with_frequency(Rate::from_hz(SD_SPI_HZ))
        // SD cards in SPI mode use CPOL=0, CPHA=0.
        .with_mode(esp_hal::spi::Mode::_0);
    let sd_card = match Spi::new(peripherals.SPI3, sd_spi_config) {
        Ok(spi) => {
            let spi = spi
                .with_sck(peripherals.GPIO39)
                .with_mosi(peripherals.GPIO38)
                .with_miso(peripherals.GPIO40);
            match open_sd_card(spi, sd_cs, Delay::new()) {
                Ok((card, _)) => Some(card),
                Err(err) => {
                    warn!("sd: probe failed: {err:?}");
                    None
                }
            }
        }
        Err(err) => {
            warn!("sd: spi config rejected: {err:?}");
            None
        }
    };
    let sd_mounted = sd_card.is_some();

    if let Some(card) = sd_card {
        let mut fonts = FontStore::new(SdByteStore::new(card, FixedTimeSource));
        match load_font(&mut fonts, &mut settings) {
            Ok(()) => {
                fonts.set_index_offset(settings.index_offset as i32);
            }
            Err(err) => warn!("font: no Chinese font ({err:?}), using ASCII"),
        }
        *ctx.glyphs_mut() = Some(CachedGlyphSource::new(fonts));
    }
    ctx.set_font_scale(settings.font_scale().get());

    show(
        &mut display,
        &mut ctx,
        &Screen::message(strings::APP_TITLE, Some(strings::READY), Some(strings::WIFI_OFF)),
    );
    Timer::after_millis(BOOT_MESSAGE_MS).await;

    let status = TimelapseStatusView {
        running: false,
        captured: 0,
        total: 0,
        interval_s: DEFAULT_INTERVAL_S,
        next_shot_s: 0,
    };

    let loop_start = Instant::now();
    let mut last_report_ms = 0u64;
    loop {
        let now_ms = loop_start.elapsed().as_millis();

        let system_info = SystemInfoView {
            battery_pct: BATTERY_PLACEHOLDER_PCT,
            charging: false,
            wifi_connected: false,
            sd_mounted,
            ip_addr: None,
            font: font_info(&ctx),
        };
        let screen = if (now_ms / SCREEN_ROTATE_MS).is_multiple_of(2) {
            Screen::TimelapseStatus(status)
        } else {
            Screen::SystemInfo(system_info)
        };
        show(&mut display, &mut ctx, &screen);

        settings_sync.track_current(&settings, now_ms);
        settings_sync.flush_if_due(settings_store.as_mut(), now_ms);

        if now_ms.saturating_sub(last_report_ms) >= 60_000 {
            if let Some(cache) = ctx.glyphs() {
                let (hits, misses) = cache.stats();
                info!("font: cache hits={hits} misses={misses} resident={}", cache.len());
            }
            last_report_ms = now_ms;
        }

        Timer::after_millis(STATUS_REFRESH_MS).await;
    }
}
