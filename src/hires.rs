//! Hi-Res (280x192) スキャンラインデコーダ
//!
//! 各バイトは7ピクセルで、bit 7が立っていると半ピクセル右にずれる。
//! 半ピクセル単位を正確に表すため、1バイトを14ドットに展開して扱う。
//!
//! 各ピクセルの色はそのピクセルだけでなく周囲のドットと水平位置の偶奇で
//! 決まる（NTSCのカラーアーティファクト）。ピクセルごとに周囲8ドットの窓と
//! 偶奇ビットでカラーパターンテーブルを引く。

use crate::dots::ArtifactWindow;
use crate::memory::{PageView, LINE_BYTES};
use crate::mode::FrameConfig;
use crate::scanline::{PixelRun, Scanline};
use crate::tables::Tables;

/// 1ライン40バイトを280ピクセル分のワードに変換
///
/// 41バイト目は0として扱い、最後のバイトのドットを押し出す。
#[inline(always)]
pub fn decode_hires_line(
    dot_patterns: &[u16; 256],
    color_patterns: &[PixelRun; 512],
    line_mem: &[u8],
    sl: &mut Scanline,
) {
    let mut dots = ArtifactWindow::new(dot_patterns[line_mem[0] as usize]);
    let mut oddness = 0usize;

    for i in 1..=LINE_BYTES {
        let b = if i < LINE_BYTES { line_mem[i] } else { 0 };
        dots.load(dot_patterns[b as usize], b & 0x80 != 0);

        // 14ドット消費
        for _ in 0..7 {
            sl.push(color_patterns[oddness | dots.window() as usize]);
            dots.advance();
            oddness ^= 0x100;
        }
    }
}

/// 1ライン40バイトを280ピクセル分のモノクロワードに変換
///
/// 色は周囲に依存しないので、現在のピクセルの2ドット（窓の位置3と4）だけで
/// `bits_to_pixels` を引く。
#[inline(always)]
pub fn decode_hires_mono_line(
    dot_patterns: &[u16; 256],
    bits_to_pixels: &[PixelRun; 4],
    line_mem: &[u8],
    sl: &mut Scanline,
) {
    let mut dots = ArtifactWindow::new(dot_patterns[line_mem[0] as usize]);

    for i in 1..=LINE_BYTES {
        let b = if i < LINE_BYTES { line_mem[i] } else { 0 };
        dots.load(dot_patterns[b as usize], b & 0x80 != 0);

        for _ in 0..7 {
            let window = dots.window();
            let bits = ((window >> 4) & 1) | ((window >> 2) & 2);
            sl.push(bits_to_pixels[bits as usize]);
            dots.advance();
        }
    }
}

/// Hi-Resの1ラインを描画（カラー）
pub fn render_hires_line(
    tables: &Tables,
    cfg: &FrameConfig,
    view: &PageView<'_>,
    line: usize,
    sl: &mut Scanline,
) {
    sl.pad_left();
    decode_hires_line(&tables.dot_patterns, &tables.color_patterns, view.main_line(line), sl);
    sl.finish(cfg.scanline_emulation);
}

/// Hi-Resの1ラインを描画（モノクロ）
pub fn render_hires_mono_line(
    tables: &Tables,
    cfg: &FrameConfig,
    view: &PageView<'_>,
    line: usize,
    sl: &mut Scanline,
) {
    sl.pad_left();
    decode_hires_mono_line(&tables.dot_patterns, &cfg.mono_pixels(), view.main_line(line), sl);
    sl.finish(cfg.scanline_emulation);
}
