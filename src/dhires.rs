//! ダブルHi-Res スキャンラインデコーダ
//!
//! 各ラインは80バイト（Aux 40バイト + Main 40バイトが交互）。
//! Auxが奇数側、Mainが偶数側で、1列あたり各7ビットずつ計14ビット。
//!
//! Video-7 RGBカードのモード:
//!   - 140x192 16色（標準）
//!   - 560x192 モノクロ
//!   - 160x192 16色（ビットのインターリーブなし）
//!   - 混在（バイトのbit 7で140色 / 560モノクロを切り替え）
//!
//! Ref: VIDEO-7 User's Manual section 7.6 and US Patent 4631692

use crate::dots::DotWindow;
use crate::memory::{PageView, LINE_BYTES};
use crate::mode::FrameConfig;
use crate::scanline::{pair, PixelRun, Scanline, THEN_EXTEND_1, THEN_EXTEND_3};
use crate::tables::Tables;

/// 先読みを止めるビット数（ここに14ビット足しても32ビットに収まる）
const LOAD_LIMIT: u32 = 18;

/// 560x192 モノクロ
///
/// 隣接する2ビットで4通りの背景色/前景色の組み合わせを選ぶ。
/// 下位ビットが先（左）に出力される。
#[inline(always)]
pub fn decode_dhires560(bits_to_pixels: &[PixelRun; 4], odd: &[u8], even: &[u8], sl: &mut Scanline) {
    for i in 0..LINE_BYTES {
        // 次の2バイトから14ビット
        let mut dots = (odd[i] & 0x7f) as usize | ((even[i] & 0x7f) as usize) << 7;
        for _ in 0..7 {
            sl.push(bits_to_pixels[dots & 0x03]);
            dots >>= 2;
        }
    }
}

/// 160x192 16色
///
/// 各バイトが2ピクセル分の色を直接持つ（下位ニブルが左）。
#[inline(always)]
pub fn decode_dhires160(palette: &[u16; 16], odd: &[u8], even: &[u8], sl: &mut Scanline) {
    for i in 0..LINE_BYTES {
        for b in [odd[i], even[i]] {
            let left = palette[(b & 0xf) as usize] | THEN_EXTEND_3;
            let right = palette[((b >> 4) & 0xf) as usize] | THEN_EXTEND_3;
            sl.push(pair(left, right));
        }
    }
}

/// 140x192 16色
///
/// 4ビットごとに1色、各色4スロット。
#[inline(always)]
pub fn decode_dhires140(palette: &[u16; 16], odd: &[u8], even: &[u8], sl: &mut Scanline) {
    let mut dots = DotWindow::new();
    let mut i = 0;

    while i < LINE_BYTES {
        // 入るだけサブピクセルを読み込む
        while dots.len() <= LOAD_LIMIT && i < LINE_BYTES {
            dots.load((odd[i] & 0x7f) as u32, 7);
            dots.load((even[i] & 0x7f) as u32, 7);
            i += 1;
        }

        // ピクセルを消費
        while dots.len() >= 8 {
            let left = palette[dots.take(4) as usize] | THEN_EXTEND_3;
            let right = palette[dots.take(4) as usize] | THEN_EXTEND_3;
            sl.push(pair(left, right));
        }
    }
}

#[inline(always)]
fn pixel_mode_bits(b: u8) -> u32 {
    if b & 0x80 != 0 { 0x7f } else { 0x00 }
}

/// 140x192 / 560x192 混在
///
/// 各バイトのbit 7をデータと並行して別のレジスタに展開する。
/// 現在の4ビットの窓のモードビットがすべて0なら4ビットで1色（4スロット）、
/// 1つでも立っていれば2ビットをモノクロ（1ビット1スロット）で出力する。
pub fn decode_dhires_mixed(palette: &[u16; 16], odd: &[u8], even: &[u8], sl: &mut Scanline) {
    let black = palette[0];
    let white = palette[15];
    let mono = |bit: u32| if bit != 0 { white } else { black };

    let mut dots = DotWindow::new();
    let mut pixelmode = DotWindow::new();
    let mut i = 0;

    loop {
        while dots.len() <= LOAD_LIMIT && i < LINE_BYTES {
            dots.load((odd[i] & 0x7f) as u32, 7);
            pixelmode.load(pixel_mode_bits(odd[i]), 7);
            dots.load((even[i] & 0x7f) as u32, 7);
            pixelmode.load(pixel_mode_bits(even[i]), 7);
            i += 1;
        }
        let last = i == LINE_BYTES;

        // 行末では4ビットに満たない残りをモノクロで出力する
        while dots.len() >= 4 || (last && dots.len() >= 2) {
            if dots.len() >= 4 && pixelmode.peek(4) == 0 {
                let color = palette[dots.take(4) as usize] | THEN_EXTEND_1;
                pixelmode.take(4);
                sl.push(pair(color, color));
            } else {
                let left = mono(dots.take(1));
                let right = mono(dots.take(1));
                pixelmode.take(2);
                sl.push(pair(left, right));
            }
        }

        if last {
            break;
        }
    }
}

/// 560x192 モノクロの1ライン
pub fn render_dhires560_line(
    _tables: &Tables,
    cfg: &FrameConfig,
    view: &PageView<'_>,
    line: usize,
    sl: &mut Scanline,
) {
    let bits_to_pixels = cfg.mono_pixels();
    sl.pad_left();
    decode_dhires560(&bits_to_pixels, view.aux_line(line), view.main_line(line), sl);
    sl.finish(cfg.scanline_emulation);
}

/// 160x192 16色の1ライン（画面幅いっぱいなのでパディングなし）
pub fn render_dhires160_line(
    tables: &Tables,
    cfg: &FrameConfig,
    view: &PageView<'_>,
    line: usize,
    sl: &mut Scanline,
) {
    decode_dhires160(&tables.lores_palette, view.aux_line(line), view.main_line(line), sl);
    sl.finish(cfg.scanline_emulation);
}

/// 140x192 16色の1ライン
pub fn render_dhires140_line(
    tables: &Tables,
    cfg: &FrameConfig,
    view: &PageView<'_>,
    line: usize,
    sl: &mut Scanline,
) {
    sl.pad_left();
    decode_dhires140(&tables.dhgr_palette, view.aux_line(line), view.main_line(line), sl);
    sl.finish(cfg.scanline_emulation);
}

/// 混在モードの1ライン
pub fn render_dhires_mixed_line(
    tables: &Tables,
    cfg: &FrameConfig,
    view: &PageView<'_>,
    line: usize,
    sl: &mut Scanline,
) {
    sl.pad_left();
    decode_dhires_mixed(&tables.dhgr_palette, view.aux_line(line), view.main_line(line), sl);
    sl.finish(cfg.scanline_emulation);
}
