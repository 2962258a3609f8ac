//! A2VGA - Apple II Hi-Res scanline renderer
//!
//! Hi-Resメモリのダンプを1フレーム描画してPNGに保存する。
//!
//! # 使用方法
//! ```text
//! a2vga --main hgr.bin
//! a2vga --main main.bin --aux aux.bin --dhires --video7 mixed -o frame.png
//! ```

use a2vga::capture::{BlankText, FrameCapture};
use a2vga::config::{self, Config};
use a2vga::memory::{Bank, Memory};
use a2vga::mode::{FrameConfig, SoftSwitches, Video7Mode};
use a2vga::render::HiresRenderer;
use a2vga::tables::{Tables, COLORS};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// A2VGA - Apple II Hi-Res scanline renderer
#[derive(Parser, Debug)]
#[command(name = "a2vga")]
#[command(author = "A2RS Project")]
#[command(version = "0.1.0")]
#[command(about = "Render an Apple II Hi-Res memory dump through the VGA scanline pipeline", long_about = None)]
struct Args {
    /// Main RAMのダンプ（8KBのHi-Resページまたは64KB）
    #[arg(short, long)]
    main: String,

    /// Aux RAMのダンプ（ダブルHi-Res用）
    #[arg(short, long)]
    aux: Option<String>,

    /// ページ2を表示
    #[arg(long)]
    page2: bool,

    /// 80STOREを有効にする（PAGE2は無視される）
    #[arg(long)]
    store80: bool,

    /// ダブルHi-Res（80COL + DHIRES）
    #[arg(short, long)]
    dhires: bool,

    /// Video-7モード (color140, mono560, color160, mixed)
    #[arg(long, value_parser = parse_video7)]
    video7: Option<Video7Mode>,

    /// 下部4行をテキスト表示
    #[arg(long)]
    mixed: bool,

    /// モノクロ表示
    #[arg(long)]
    mono: bool,

    /// スキャンラインエミュレーション
    #[arg(long)]
    scanlines: bool,

    /// 設定ファイル
    #[arg(short, long)]
    config: Option<String>,

    /// 出力PNGファイル（省略時は出力ディレクトリに保存）
    #[arg(short, long)]
    output: Option<String>,

    /// コマンドラインの表示設定を設定ファイルに保存
    #[arg(long)]
    save_config: bool,
}

/// Video-7モード名をパース
fn parse_video7(s: &str) -> Result<Video7Mode, String> {
    match s.trim().to_lowercase().as_str() {
        "color140" | "140" => Ok(Video7Mode::Color140),
        "mono560" | "560" => Ok(Video7Mode::Mono560),
        "color160" | "160" => Ok(Video7Mode::Color160),
        "mixed" => Ok(Video7Mode::Mixed),
        _ => Err(format!("Unknown Video-7 mode: {}", s)),
    }
}

/// コマンドラインからソフトスイッチを組み立てる
fn soft_switches(args: &Args) -> SoftSwitches {
    let mut switches = SoftSwitches::HIRES;
    switches.set(SoftSwitches::PAGE2, args.page2);
    switches.set(SoftSwitches::STORE80, args.store80);
    switches.set(SoftSwitches::MIXED, args.mixed);
    switches.set(SoftSwitches::COL80 | SoftSwitches::DHIRES, args.dhires);
    switches
}

fn load_dump(memory: &mut Memory, bank: Bank, page2: bool, path: &str) -> Result<(), String> {
    let data = fs::read(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    memory.load_dump(bank, page2, &data)
}

fn run(args: Args) -> Result<(), String> {
    let config_path = args
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(config::get_config_path);
    let mut config = Config::load_from(&config_path);

    // コマンドライン指定を優先
    if args.mono {
        config.display.monochrome = true;
    }
    if args.scanlines {
        config.display.scanline_emulation = true;
    }
    if let Some(mode) = args.video7 {
        config.video7_mode = mode;
    }
    if args.save_config {
        config.save_to(&config_path)?;
        log::info!("Config saved to {:?}", config_path);
    }

    let switches = soft_switches(&args);
    let cfg = FrameConfig::capture(switches, config.video7_mode, &config.display);
    log::info!("Switches {:?}, mode {:?}", switches, cfg.mode);

    // 8KBのダンプは表示されるページに配置
    let shown_page2 = cfg.page2 && !cfg.store_80;
    let mut memory = Memory::new();
    load_dump(&mut memory, Bank::Main, shown_page2, &args.main)?;
    if let Some(aux) = &args.aux {
        load_dump(&mut memory, Bank::Aux, shown_page2, aux)?;
    } else if cfg.mode.is_double() {
        log::warn!("Double Hi-Res without an aux dump; odd columns will be blank");
    }

    let tables = Tables::generate(&COLORS);
    let renderer = HiresRenderer::new(&tables);
    let mut capture = FrameCapture::new();
    let mut text = BlankText { scanline_emulation: cfg.scanline_emulation };
    renderer.render_frame(&mut capture, &mut text, &memory, &cfg);

    let output = match args.output {
        Some(path) => PathBuf::from(path),
        None => {
            let timestamp = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            config
                .ensure_output_dir()?
                .join(format!("frame_{}.png", timestamp))
        }
    };
    capture.save_png(&output)?;
    println!("Frame saved to {}", output.display());
    Ok(())
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
