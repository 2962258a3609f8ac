//! フレーム描画
//!
//! ラスタドライバからスキャンラインを借り、表示モードに応じたデコーダで
//! 埋めて返却する。デコーダはフレームの先頭で一度だけ選択する。

use crate::dhires;
use crate::hires;
use crate::memory::{HiresPages, PageView, HIRES_LINES};
use crate::mode::{FrameConfig, RenderMode};
use crate::scanline::Scanline;
use crate::tables::Tables;

/// 上下センタリングのためにスキップするライン数
pub const VERTICAL_SKIP_LINES: u32 = 48;
/// ミックスモードのグラフィックス部分のライン数
pub const MIXED_GRAPHICS_LINES: usize = 160;
/// ミックスモードのテキスト行
pub const MIXED_TEXT_ROWS: std::ops::Range<u32> = 20..24;

/// スキャンラインを出力するラスタドライバ
pub trait SignalDriver {
    /// フレームの開始
    fn prepare_frame(&mut self);
    /// `n` ライン分を空白で出力
    fn skip_lines(&mut self, n: u32);
    /// 次のラインのバッファを借りる
    fn prepare_scanline(&mut self) -> Scanline;
    /// 埋めたバッファを返却
    fn submit_scanline(&mut self, sl: Scanline);
}

/// テキスト行の描画（40桁 / 80桁のテキストレンダラ）
pub trait TextRenderer {
    fn render_text_line(&mut self, driver: &mut dyn SignalDriver, row: u32);
}

/// 1ラインのデコーダ
pub type LineDecoder = fn(&Tables, &FrameConfig, &PageView<'_>, usize, &mut Scanline);

/// 描画モードに対応するデコーダ
pub fn line_decoder(mode: RenderMode) -> LineDecoder {
    match mode {
        RenderMode::Hires => hires::render_hires_line,
        RenderMode::HiresMono => hires::render_hires_mono_line,
        RenderMode::Dhires140 => dhires::render_dhires140_line,
        RenderMode::Dhires560 => dhires::render_dhires560_line,
        RenderMode::Dhires160 => dhires::render_dhires160_line,
        RenderMode::DhiresMixed => dhires::render_dhires_mixed_line,
    }
}

/// Hi-Res / ダブルHi-Res フレームレンダラ
pub struct HiresRenderer<'t> {
    tables: &'t Tables,
}

impl<'t> HiresRenderer<'t> {
    pub fn new(tables: &'t Tables) -> Self {
        HiresRenderer { tables }
    }

    /// 全画面グラフィックス（192ライン）
    pub fn render_hires<D, M>(&self, driver: &mut D, memory: &M, cfg: &FrameConfig)
    where
        D: SignalDriver + ?Sized,
        M: HiresPages + ?Sized,
    {
        driver.prepare_frame();
        driver.skip_lines(VERTICAL_SKIP_LINES);
        self.render_lines(driver, memory, cfg, HIRES_LINES);
    }

    /// グラフィックス160ライン + 下部テキスト4行
    ///
    /// テキストレンダラへは `&mut dyn SignalDriver` として渡すため `D` はサイズ既知に限る。
    pub fn render_mixed_hires<D, M, T>(&self, driver: &mut D, text: &mut T, memory: &M, cfg: &FrameConfig)
    where
        D: SignalDriver,
        M: HiresPages + ?Sized,
        T: TextRenderer + ?Sized,
    {
        driver.prepare_frame();
        driver.skip_lines(VERTICAL_SKIP_LINES);
        self.render_lines(driver, memory, cfg, MIXED_GRAPHICS_LINES);

        for row in MIXED_TEXT_ROWS {
            text.render_text_line(&mut *driver, row);
        }
    }

    /// MIXEDスイッチに従ってどちらかを描画
    pub fn render_frame<D, M, T>(&self, driver: &mut D, text: &mut T, memory: &M, cfg: &FrameConfig)
    where
        D: SignalDriver,
        M: HiresPages + ?Sized,
        T: TextRenderer + ?Sized,
    {
        if cfg.mixed {
            self.render_mixed_hires(driver, text, memory, cfg);
        } else {
            self.render_hires(driver, memory, cfg);
        }
    }

    fn render_lines<D, M>(&self, driver: &mut D, memory: &M, cfg: &FrameConfig, lines: usize)
    where
        D: SignalDriver + ?Sized,
        M: HiresPages + ?Sized,
    {
        let view = PageView::select(memory, cfg.page2, cfg.store_80);
        let decode = line_decoder(cfg.mode);

        for line in 0..lines {
            let mut sl = driver.prepare_scanline();
            decode(self.tables, cfg, &view, line, &mut sl);
            driver.submit_scanline(sl);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Memory;
    use crate::mode::{DisplayPrefs, SoftSwitches, Video7Mode};
    use crate::scanline::{LEFT_BORDER_SLOTS, RASTER_SLOTS};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Frame,
        Skip(u32),
        Line(usize),
        Text(u32),
    }

    type EventLog = Rc<RefCell<Vec<Event>>>;

    /// 呼び出し順と提出されたラインを記録するドライバ
    #[derive(Default)]
    struct RecordingDriver {
        log: EventLog,
        lines: Vec<Scanline>,
    }

    impl RecordingDriver {
        fn events(&self) -> std::cell::Ref<'_, Vec<Event>> {
            self.log.borrow()
        }
    }

    impl SignalDriver for RecordingDriver {
        fn prepare_frame(&mut self) {
            self.log.borrow_mut().push(Event::Frame);
        }

        fn skip_lines(&mut self, n: u32) {
            self.log.borrow_mut().push(Event::Skip(n));
        }

        fn prepare_scanline(&mut self) -> Scanline {
            Scanline::new()
        }

        fn submit_scanline(&mut self, sl: Scanline) {
            self.log.borrow_mut().push(Event::Line(self.lines.len()));
            self.lines.push(sl);
        }
    }

    /// ドライバと同じログに行番号を記録するテキストレンダラ
    #[derive(Default)]
    struct RecordingText {
        log: EventLog,
    }

    impl TextRenderer for RecordingText {
        fn render_text_line(&mut self, _driver: &mut dyn SignalDriver, row: u32) {
            self.log.borrow_mut().push(Event::Text(row));
        }
    }

    fn config(switches: SoftSwitches, video7: Video7Mode) -> FrameConfig {
        FrameConfig::capture(switches, video7, &DisplayPrefs::default())
    }

    #[test]
    fn test_full_screen_zero_page() {
        let tables = Tables::default();
        let renderer = HiresRenderer::new(&tables);
        let memory = Memory::new();
        let mut driver = RecordingDriver::default();
        renderer.render_hires(&mut driver, &memory, &config(SoftSwitches::HIRES, Video7Mode::Color140));

        assert_eq!(driver.events()[..2], [Event::Frame, Event::Skip(VERTICAL_SKIP_LINES)]);
        assert_eq!(driver.lines.len(), 192);
        for sl in &driver.lines {
            let slots = sl.expand();
            assert_eq!(slots.len(), LEFT_BORDER_SLOTS + 560);
            assert!(slots.iter().all(|&c| c == 0));
            // パディング3ワード + 280ピクセル
            assert_eq!(sl.len(), 3 + 280);
            assert_eq!(sl.repeat_count, 1);
            // ドライバ側の右ボーダーと合わせて640スロット（320列）
            assert_eq!(slots.len() + LEFT_BORDER_SLOTS, RASTER_SLOTS);
        }
    }

    #[test]
    fn test_mixed_hires_sequence() {
        let tables = Tables::default();
        let renderer = HiresRenderer::new(&tables);
        let memory = Memory::new();
        let mut driver = RecordingDriver::default();
        let mut text = RecordingText { log: driver.log.clone() };
        let cfg = config(SoftSwitches::HIRES | SoftSwitches::MIXED, Video7Mode::Color140);
        renderer.render_mixed_hires(&mut driver, &mut text, &memory, &cfg);

        assert_eq!(driver.lines.len(), MIXED_GRAPHICS_LINES);
        let mut expected = vec![Event::Frame, Event::Skip(VERTICAL_SKIP_LINES)];
        expected.extend((0..160).map(Event::Line));
        expected.extend((20..24).map(Event::Text));
        assert_eq!(*driver.events(), expected);
    }

    #[test]
    fn test_render_frame_follows_mixed_switch() {
        let tables = Tables::default();
        let renderer = HiresRenderer::new(&tables);
        let memory = Memory::new();
        let mut text = RecordingText::default();

        let mut driver = RecordingDriver::default();
        renderer.render_frame(&mut driver, &mut text, &memory, &config(SoftSwitches::HIRES, Video7Mode::Color140));
        assert_eq!(driver.lines.len(), 192);

        let mut driver = RecordingDriver::default();
        let cfg = config(SoftSwitches::HIRES | SoftSwitches::MIXED, Video7Mode::Color140);
        renderer.render_frame(&mut driver, &mut text, &memory, &cfg);
        assert_eq!(driver.lines.len(), 160);
    }

    #[test]
    fn test_full_screen_through_dyn_driver() {
        let tables = Tables::default();
        let renderer = HiresRenderer::new(&tables);
        let memory = Memory::new();
        let mut recording = RecordingDriver::default();
        {
            let driver: &mut dyn SignalDriver = &mut recording;
            renderer.render_hires(driver, &memory, &config(SoftSwitches::HIRES, Video7Mode::Color140));
        }
        assert_eq!(recording.lines.len(), 192);

        // 混在フレームは具体型のドライバで
        let mut text = RecordingText { log: recording.log.clone() };
        let cfg = config(SoftSwitches::HIRES | SoftSwitches::MIXED, Video7Mode::Color140);
        renderer.render_frame(&mut recording, &mut text, &memory, &cfg);
        assert_eq!(recording.lines.len(), 192 + 160);
    }

    #[test]
    fn test_double_hires_selection() {
        let tables = Tables::default();
        let renderer = HiresRenderer::new(&tables);
        let memory = Memory::new();

        // 160x192はパディングなしで640スロット
        let mut driver = RecordingDriver::default();
        let sw = SoftSwitches::HIRES | SoftSwitches::COL80 | SoftSwitches::DHIRES;
        renderer.render_hires(&mut driver, &memory, &config(sw, Video7Mode::Color160));
        assert!(driver.lines.iter().all(|sl| sl.width() == RASTER_SLOTS));

        // COL80なしでは常にHi-Res
        let mut driver = RecordingDriver::default();
        let sw = SoftSwitches::HIRES | SoftSwitches::DHIRES;
        renderer.render_hires(&mut driver, &memory, &config(sw, Video7Mode::Color160));
        assert!(driver.lines.iter().all(|sl| sl.len() == 283));
    }

    #[test]
    fn test_page_selection_reaches_decoder() {
        let tables = Tables::default();
        let renderer = HiresRenderer::new(&tables);
        let mut memory = Memory::new();
        memory.main_ram[0x4000..0x4000 + 40].fill(0x7F);

        let mut driver = RecordingDriver::default();
        let cfg = config(SoftSwitches::HIRES | SoftSwitches::PAGE2, Video7Mode::Color140);
        renderer.render_hires(&mut driver, &memory, &cfg);
        assert!(driver.lines[0].expand().iter().any(|&c| c == 0xFFF));
        assert!(driver.lines[1].expand().iter().all(|&c| c == 0));

        let mut driver = RecordingDriver::default();
        let cfg = config(SoftSwitches::HIRES | SoftSwitches::PAGE2 | SoftSwitches::STORE80, Video7Mode::Color140);
        renderer.render_hires(&mut driver, &memory, &cfg);
        assert!(driver.lines[0].expand().iter().all(|&c| c == 0));
    }
}
