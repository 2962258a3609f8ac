//! A2VGA - Apple II Hi-Res scanline renderer
//!
//! Apple IIのHi-Res / ダブルHi-Resメモリを、VGA型ラスタドライバ向けの
//! ピクセルランに変換する:
//! - 280x192 Hi-Res（NTSCカラーアーティファクト / モノクロ）
//! - ダブルHi-Res 140x192 / 560x192 / 160x192 / 混在（Video-7）
//! - 全画面 / ミックスモード（下部テキスト4行）

pub mod scanline;
pub mod dots;
pub mod tables;
pub mod memory;
pub mod mode;
pub mod hires;
pub mod dhires;
pub mod render;
pub mod capture;
pub mod config;

pub use capture::{BlankText, FrameCapture};
pub use memory::{HiresPages, Memory, PageView};
pub use mode::{DisplayPrefs, FrameConfig, RenderMode, SoftSwitches, Video7Mode};
pub use render::{HiresRenderer, SignalDriver, TextRenderer};
pub use scanline::{PixelRun, Scanline};
pub use tables::Tables;
