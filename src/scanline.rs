//! スキャンラインバッファとピクセルランワード
//!
//! ラスタドライバが1ラインずつ貸し出すバッファ。デコーダはここに
//! ピクセルランワード（16ビット×2）を書き込み、ドライバへ返却する。
//!
//! ハーフワードの形式:
//!   bit 0-11  : RGB444カラー
//!   bit 12-13 : エクステンドコード（0→1スロット, 1→2, 2→4, 3→8）
//!   bit 14    : ライン保持（HSYNC待ち）命令、下位ハーフワードのみ
//!
//! 下位ハーフワードが先（画面左側）に出力される。

/// ピクセルランワード（ハーフワード2つ）
pub type PixelRun = u32;

/// RGB444カラー部分のマスク
pub const COLOR_MASK: u16 = 0x0FFF;

/// 色を1スロット追加で保持
pub const THEN_EXTEND_1: u16 = 1 << 12;
/// 色を3スロット追加で保持
pub const THEN_EXTEND_3: u16 = 2 << 12;
/// 色を7スロット追加で保持
pub const THEN_EXTEND_7: u16 = 3 << 12;

const EXTEND_SHIFT: u16 = 12;
const EXTEND_SLOTS: [usize; 4] = [0, 1, 3, 7];

/// 残りのラインを出力せずHSYNCを待つ（間に空白ラインを挟む）
pub const THEN_WAIT_HSYNC: PixelRun = 1 << 14;

/// 1ラインあたりのワード容量
pub const SCANLINE_WORDS: usize = 320;

/// ラスタ1ラインのスロット数
pub const RASTER_SLOTS: usize = 640;

/// 水平センタリング用の左パディング（スロット数）
pub const LEFT_BORDER_SLOTS: usize = 40;

/// 2つのハーフワードを1ワードにまとめる（`left` が先に出力される）
#[inline(always)]
pub const fn pair(left: u16, right: u16) -> PixelRun {
    (left as u32) | ((right as u32) << 16)
}

/// ハーフワードが占めるスロット数
#[inline]
pub const fn halfword_slots(hw: u16) -> usize {
    1 + EXTEND_SLOTS[((hw >> EXTEND_SHIFT) & 0x3) as usize]
}

/// ドライバから貸し出されるスキャンラインバッファ
#[derive(Clone)]
pub struct Scanline {
    data: [PixelRun; SCANLINE_WORDS],
    length: usize,
    /// ドライバがこのラインを追加で出力する回数
    pub repeat_count: u8,
}

impl Default for Scanline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scanline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanline")
            .field("length", &self.length)
            .field("repeat_count", &self.repeat_count)
            .finish()
    }
}

impl Scanline {
    pub fn new() -> Self {
        Scanline {
            data: [0; SCANLINE_WORDS],
            length: 0,
            repeat_count: 0,
        }
    }

    /// 再利用前にリセット
    pub fn clear(&mut self) {
        self.length = 0;
        self.repeat_count = 0;
    }

    #[inline(always)]
    pub fn push(&mut self, word: PixelRun) {
        self.data[self.length] = word;
        self.length += 1;
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// 書き込み済みのワード
    pub fn words(&self) -> &[PixelRun] {
        &self.data[..self.length]
    }

    /// 左側40スロットの空白
    #[inline]
    pub fn pad_left(&mut self) {
        self.push(pair(THEN_EXTEND_7, THEN_EXTEND_7)); // 16 slots
        self.push(pair(THEN_EXTEND_7, THEN_EXTEND_7)); // 16 slots
        self.push(pair(THEN_EXTEND_3, THEN_EXTEND_3)); // 8 slots
    }

    /// ラインの終端処理
    ///
    /// スキャンラインエミュレーション有効時はHSYNC待ちを追加して
    /// 次のラインを空白にし、無効時は同じラインを2回出力させる。
    #[inline]
    pub fn finish(&mut self, scanline_emulation: bool) {
        if scanline_emulation {
            self.push(THEN_WAIT_HSYNC);
        } else {
            self.repeat_count = 1;
        }
    }

    /// ライン保持命令で終わっているか
    pub fn holds(&self) -> bool {
        self.words()
            .last()
            .map_or(false, |&w| (w as u16) & (THEN_WAIT_HSYNC as u16) != 0)
    }

    /// スロット単位の色列に展開（保持命令で打ち切り）
    pub fn expand(&self) -> Vec<u16> {
        let mut slots = Vec::with_capacity(RASTER_SLOTS);
        for &word in self.words() {
            for hw in [word as u16, (word >> 16) as u16] {
                if hw & (THEN_WAIT_HSYNC as u16) != 0 {
                    return slots;
                }
                let color = hw & COLOR_MASK;
                for _ in 0..halfword_slots(hw) {
                    slots.push(color);
                }
            }
        }
        slots
    }

    /// 出力されるスロット数
    pub fn width(&self) -> usize {
        let mut width = 0;
        for &word in self.words() {
            for hw in [word as u16, (word >> 16) as u16] {
                if hw & (THEN_WAIT_HSYNC as u16) != 0 {
                    return width;
                }
                width += halfword_slots(hw);
            }
        }
        width
    }
}
