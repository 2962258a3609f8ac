//! ドット展開テーブルとカラーテーブル
//!
//! スキャンライン処理中に計算しないよう、起動時に一度だけ生成する。
//! 生成後は読み取り専用。

use crate::scanline::{pair, PixelRun};

/// Apple IIのカラーパレット（NTSC artifact colors）
/// ダブルHi-Res / Lo-Resの4ビットカラー番号の順
pub const COLORS: [u32; 16] = [
    0x000000, // 0: Black
    0xDD0033, // 1: Magenta
    0x604EBD, // 2: Dark Blue
    0xFF44FD, // 3: Purple (NTSC artifact)
    0x00A360, // 4: Dark Green
    0x9C9C9C, // 5: Gray 1
    0x14CFFD, // 6: Medium Blue (NTSC artifact - cyan-ish)
    0xD0C3FF, // 7: Light Blue
    0x607203, // 8: Brown
    0xFF6A3C, // 9: Orange (NTSC artifact)
    0x9C9C9C, // 10: Gray 2
    0xFFA0D0, // 11: Pink
    0x14F53C, // 12: Light Green (NTSC artifact)
    0xD0DD8D, // 13: Yellow
    0x72FFD0, // 14: Aqua
    0xFFFFFF, // 15: White
];

/// モノクロ表示色（緑）
pub const HIRES_GREEN: u32 = 0x33FF33;

/// RGB888 → RGB444
pub const fn rgb444(rgb: u32) -> u16 {
    let r = ((rgb >> 20) & 0xF) as u16;
    let g = ((rgb >> 12) & 0xF) as u16;
    let b = ((rgb >> 4) & 0xF) as u16;
    (r << 8) | (g << 4) | b
}

/// RGB444 → RGB888（各4ビットを複製して拡張）
pub const fn rgb888(color: u16) -> u32 {
    let r = ((color >> 8) & 0xF) as u32;
    let g = ((color >> 4) & 0xF) as u32;
    let b = (color & 0xF) as u32;
    ((r * 0x11) << 16) | ((g * 0x11) << 8) | (b * 0x11)
}

/// 1バイトを14ドットに展開
///
/// ピクセルi（bit i、左端がbit 0）はドット 13-2i と 12-2i を占める。
/// bit 7が立っていると全体が1ドット右にずれ、最後のドットは押し出される。
pub const fn dot_pattern(b: u8) -> u16 {
    let mut pattern: u16 = 0;
    let mut i = 0;
    while i < 7 {
        if b & (1 << i) != 0 {
            pattern |= 0b11 << (12 - 2 * i);
        }
        i += 1;
    }
    if b & 0x80 != 0 {
        pattern >>= 1;
    }
    pattern
}

/// 窓内の位置 `pos`（0 = 左端）のドット
#[inline]
const fn window_dot(window: u32, pos: u32) -> u32 {
    (window >> (7 - pos)) & 1
}

/// カラーアーティファクトの4ビットカラー番号
///
/// 窓の位置 `start` から4ドットを色副搬送波の位相に合わせて並べ替えたもの。
/// 位相は絶対ドット位置 mod 4 で、偶数ピクセルの先頭ドット（窓の位置3）が位相0。
pub const fn artifact_nibble(window: u32, odd: bool, start: u32) -> usize {
    let base = if odd { 2 } else { 0 };
    let mut nibble = 0;
    let mut q = start;
    while q < start + 4 {
        let phase = (base + q + 1) % 4;
        nibble |= window_dot(window, q) << phase;
        q += 1;
    }
    nibble as usize
}

/// 2色の中間色 (RGB888)
const fn blend(a: u32, b: u32) -> u32 {
    let mut out = 0;
    let mut shift = 0;
    while shift < 24 {
        let ca = (a >> shift) & 0xff;
        let cb = (b >> shift) & 0xff;
        out |= ((ca + cb) / 2) << shift;
        shift += 8;
    }
    out
}

/// 窓の位置 `pos` のドットの色 (RGB888)
///
/// そのドットを2番目 / 3番目に含む2つの4ドット窓の色の中間色。
/// 前後2ドットずつが対称に影響する。
pub fn artifact_color(palette: &[u32; 16], window: u32, odd: bool, pos: u32) -> u32 {
    blend(
        palette[artifact_nibble(window, odd, pos - 2)],
        palette[artifact_nibble(window, odd, pos - 1)],
    )
}

/// 描画に使う全テーブル
#[derive(Clone)]
pub struct Tables {
    /// バイト → 14ドット
    pub dot_patterns: [u16; 256],
    /// (奇数ピクセル << 8) | 8ドット窓 → ピクセル2ドット分の色
    pub color_patterns: [PixelRun; 512],
    /// ダブルHi-Res 16色
    pub dhgr_palette: [u16; 16],
    /// Lo-Res 16色（160x192モードでも使用）
    pub lores_palette: [u16; 16],
}

impl Default for Tables {
    fn default() -> Self {
        Self::generate(&COLORS)
    }
}

impl Tables {
    /// パレットからテーブルを生成
    ///
    /// モノクロ色はフレームごとに `FrameConfig` から決まるため含まない。
    pub fn generate(palette: &[u32; 16]) -> Self {
        let mut dhgr_palette = [0u16; 16];
        for (dst, &rgb) in dhgr_palette.iter_mut().zip(palette.iter()) {
            *dst = rgb444(rgb);
        }

        let mut dot_patterns = [0u16; 256];
        for (b, dst) in dot_patterns.iter_mut().enumerate() {
            *dst = dot_pattern(b as u8);
        }

        let mut color_patterns = [0; 512];
        for index in 0..512u32 {
            let odd = index & 0x100 != 0;
            let window = index & 0xff;
            // 現在のピクセルは窓の位置3と4
            color_patterns[index as usize] = pair(
                rgb444(artifact_color(palette, window, odd, 3)),
                rgb444(artifact_color(palette, window, odd, 4)),
            );
        }

        log::debug!("Generated hi-res tables");

        Tables {
            dot_patterns,
            color_patterns,
            dhgr_palette,
            lores_palette: dhgr_palette,
        }
    }
}
