//! ドット蓄積レジスタ
//!
//! 画面メモリのビットを左から右へ順に消費するためのシフトレジスタ。
//! `DotWindow` はLSB側から取り出すFIFO（ダブルHi-Res用）、
//! `ArtifactWindow` はMSB側に8ドットの観測窓を持つレジスタ（Hi-Res用）。

/// 32ビットのドットFIFO
///
/// `load` で上側に追加し `take` で下位ビットから取り出す。
/// 保持ビット数が `CAPACITY` を超えないよう呼び出し側で先読み量を制限する。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DotWindow {
    bits: u32,
    count: u32,
}

#[inline(always)]
const fn low_mask(n: u32) -> u32 {
    if n >= 32 {
        u32::MAX
    } else {
        (1u32 << n) - 1
    }
}

impl DotWindow {
    pub const CAPACITY: u32 = 32;

    pub const fn new() -> Self {
        DotWindow { bits: 0, count: 0 }
    }

    /// `value` の下位 `n` ビットを末尾に追加
    #[inline(always)]
    pub fn load(&mut self, value: u32, n: u32) {
        debug_assert!(self.count + n <= Self::CAPACITY);
        self.bits |= (value & low_mask(n)) << self.count;
        self.count += n;
    }

    /// 保持しているビット数
    #[inline(always)]
    pub fn len(&self) -> u32 {
        self.count
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// 先頭 `n` ビットを消費せずに参照
    #[inline(always)]
    pub fn peek(&self, n: u32) -> u32 {
        self.bits & low_mask(n)
    }

    /// 先頭 `n` ビットを取り出す
    #[inline(always)]
    pub fn take(&mut self, n: u32) -> u32 {
        debug_assert!(n <= self.count);
        let value = self.peek(n);
        self.bits = if n >= 32 { 0 } else { self.bits >> n };
        self.count -= n;
        value
    }
}

/// Hi-Resの14ドットパターン用レジスタ
///
/// ドットはMSBからLSBへ（左から右へ）走査される:
///
/// ```text
///          previous  | current |   next
///         +----+----+----+----+----+----+----+----+----
/// dots:   | 31 | 30 | 29 | 28 | 27 | 26 | 25 | 24 | ...
///         +----+----+----+----+----+----+----+----+----
///                        \_________/
///                       current pixel
/// ```
///
/// 新しいバイトのパターンはbit 14-1に、直前のバイトはbit 28-15にある。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactWindow {
    dots: u32,
}

impl ArtifactWindow {
    /// 最初のバイトの14ドットを読み込んだ状態
    #[inline(always)]
    pub const fn new(first: u16) -> Self {
        ArtifactWindow {
            dots: (first as u32) << 15,
        }
    }

    /// 次のバイトの14ドットを読み込む
    ///
    /// `delayed` の場合、直前のバイトの最後のドットを1ドット延長する。
    #[inline(always)]
    pub fn load(&mut self, pattern: u16, delayed: bool) {
        if delayed {
            self.dots |= (self.dots & (1 << 15)) >> 1;
        }
        self.dots |= (pattern as u32) << 1;
    }

    /// 現在のピクセルを中心とした8ドットの窓
    #[inline(always)]
    pub const fn window(&self) -> u32 {
        (self.dots >> 24) & 0xff
    }

    /// 1ピクセル（2ドット）進める
    #[inline(always)]
    pub fn advance(&mut self) {
        self.dots <<= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_window_fifo_order() {
        let mut w = DotWindow::new();
        w.load(0b101, 3);
        w.load(0b11, 2);
        assert_eq!(w.len(), 5);
        assert_eq!(w.take(1), 1);
        assert_eq!(w.take(2), 0b10);
        assert_eq!(w.peek(2), 0b11);
        assert_eq!(w.take(2), 0b11);
        assert!(w.is_empty());
    }

    #[test]
    fn test_dot_window_masks_input() {
        let mut w = DotWindow::new();
        w.load(0xff, 7);
        w.load(0, 7);
        assert_eq!(w.take(14), 0x7f);
    }

    #[test]
    fn test_dot_window_full_capacity() {
        let mut w = DotWindow::new();
        w.load(0x3ffff, 18);
        w.load(0x3fff, 14);
        assert_eq!(w.len(), DotWindow::CAPACITY);
        assert_eq!(w.take(32), u32::MAX);
        assert!(w.is_empty());
    }

    #[test]
    fn test_artifact_window_first_byte() {
        // 最初のピクセルの2ドットは窓のbit 4-3
        let w = ArtifactWindow::new(0b11 << 12);
        assert_eq!(w.window(), 0b0001_1000);
    }

    #[test]
    fn test_artifact_window_delay_extends_last_dot() {
        let mut w = ArtifactWindow::new(0b1); // 最後のドットだけ点灯
        w.load(0, true);
        for _ in 0..6 {
            w.advance();
        }
        // 最後のピクセルの2ドット目と、次のバイトへ延長されたドット
        assert_eq!(w.window() & 0b0000_1100, 0b0000_1100);
    }

    #[test]
    fn test_artifact_window_no_delay() {
        let mut w = ArtifactWindow::new(0b1);
        w.load(0, false);
        for _ in 0..6 {
            w.advance();
        }
        assert_eq!(w.window() & 0b0000_1100, 0b0000_1000);
    }
}
