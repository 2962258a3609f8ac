//! 表示モードとフレーム単位の設定スナップショット
//!
//! ソフトスイッチは別スレッド（エミュレーション側）から更新されるため、
//! フレームの先頭で `FrameConfig` に取り込み、フレーム中は変更しない。

use crate::scanline::{pair, PixelRun};
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// 表示に関係するソフトスイッチ
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SoftSwitches: u16 {
        /// $C052/$C053
        const MIXED   = 0b0000_0010;
        /// $C054/$C055
        const PAGE2   = 0b0000_0100;
        /// $C056/$C057
        const HIRES   = 0b0000_1000;
        /// $C000/$C001
        const STORE80 = 0b0001_0000;
        /// $C00C/$C00D
        const COL80   = 0b0010_0000;
        /// $C05E/$C05F
        const DHIRES  = 0b0100_0000;
    }
}

/// Video-7 RGBカードのダブルHi-Resモード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Video7Mode {
    /// 140x192 16色（標準）
    #[default]
    Color140,
    /// 560x192 モノクロ
    Mono560,
    /// 160x192 16色
    Color160,
    /// バイトごとに140色 / 560モノクロを切り替え
    Mixed,
}

/// 表示設定（エミュレータ側の設定値）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPrefs {
    /// モノクロ表示
    #[serde(default)]
    pub monochrome: bool,
    /// ライン間に空白ラインを入れる（CRT風）
    #[serde(default)]
    pub scanline_emulation: bool,
    /// モノクロ前景色 (RGB888)
    #[serde(default = "default_mono_fg")]
    pub mono_fg: u32,
    /// モノクロ背景色 (RGB888)
    #[serde(default)]
    pub mono_bg: u32,
}

fn default_mono_fg() -> u32 { 0xFFFFFF }

impl Default for DisplayPrefs {
    fn default() -> Self {
        DisplayPrefs {
            monochrome: false,
            scanline_emulation: false,
            mono_fg: default_mono_fg(),
            mono_bg: 0x000000,
        }
    }
}

/// フレームの描画モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// 280x192 Hi-Res（NTSCアーティファクトカラー）
    Hires,
    /// 280x192 Hi-Res（モノクロ）
    HiresMono,
    /// 140x192 16色
    Dhires140,
    /// 560x192 モノクロ
    Dhires560,
    /// 160x192 16色
    Dhires160,
    /// 140x192 / 560x192 混在
    DhiresMixed,
}

impl RenderMode {
    pub fn is_double(self) -> bool {
        !matches!(self, RenderMode::Hires | RenderMode::HiresMono)
    }
}

/// 1フレーム分の不変な設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    pub mode: RenderMode,
    /// 表示ページ2（80STORE考慮前）
    pub page2: bool,
    pub store_80: bool,
    /// 下部4行をテキスト表示
    pub mixed: bool,
    pub scanline_emulation: bool,
    /// 560x192モードの前景色 (RGB444)
    pub mono_fg: u16,
    /// 560x192モードの背景色 (RGB444)
    pub mono_bg: u16,
}

impl FrameConfig {
    /// ソフトスイッチと設定からスナップショットを作成
    ///
    /// ダブルHi-ResはCOL80とDHIRESが両方有効な場合のみ。
    /// モノクロ設定時は560x192モードを強制する。
    pub fn capture(switches: SoftSwitches, video7: Video7Mode, prefs: &DisplayPrefs) -> Self {
        let double = switches.contains(SoftSwitches::COL80 | SoftSwitches::DHIRES);
        let mode = match (double, prefs.monochrome) {
            (false, false) => RenderMode::Hires,
            (false, true) => RenderMode::HiresMono,
            (true, true) => RenderMode::Dhires560,
            (true, false) => match video7 {
                Video7Mode::Color140 => RenderMode::Dhires140,
                Video7Mode::Mono560 => RenderMode::Dhires560,
                Video7Mode::Color160 => RenderMode::Dhires160,
                Video7Mode::Mixed => RenderMode::DhiresMixed,
            },
        };
        FrameConfig {
            mode,
            page2: switches.contains(SoftSwitches::PAGE2),
            store_80: switches.contains(SoftSwitches::STORE80),
            mixed: switches.contains(SoftSwitches::MIXED),
            scanline_emulation: prefs.scanline_emulation,
            mono_fg: crate::tables::rgb444(prefs.mono_fg),
            mono_bg: crate::tables::rgb444(prefs.mono_bg),
        }
    }

    /// モノクロの2ドット → ピクセルペア（下位ビットが左）
    ///
    /// 280x192 / 560x192 のどちらのモノクロ表示もこの色を使う。
    pub fn mono_pixels(&self) -> [PixelRun; 4] {
        let (bg, fg) = (self.mono_bg, self.mono_fg);
        [pair(bg, bg), pair(fg, bg), pair(bg, fg), pair(fg, fg)]
    }
}
