//! ソフトウェアラスタドライバ
//!
//! 提出されたスキャンラインを640x480のRGBフレームバッファに展開する。
//! 実機のVGA出力と同じく、ラインの繰り返しと保持命令を解釈する。

use crate::render::{SignalDriver, TextRenderer};
use crate::scanline::{Scanline, RASTER_SLOTS};
use crate::tables::rgb888;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// フレームバッファの幅
pub const CAPTURE_WIDTH: usize = RASTER_SLOTS;
/// フレームバッファの高さ
pub const CAPTURE_HEIGHT: usize = 480;

/// テキスト1行のライン数
pub const TEXT_ROW_LINES: usize = 8;

/// 1フレームを取り込むドライバ
pub struct FrameCapture {
    framebuffer: Vec<u32>,
    row: usize,
    spare: Option<Scanline>,
    /// 画面外に落ちたライン数
    dropped: usize,
}

impl Default for FrameCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCapture {
    pub fn new() -> Self {
        FrameCapture {
            framebuffer: vec![0; CAPTURE_WIDTH * CAPTURE_HEIGHT],
            row: 0,
            spare: None,
            dropped: 0,
        }
    }

    /// フレームバッファ (0xRRGGBB)
    pub fn framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.framebuffer[y * CAPTURE_WIDTH + x]
    }

    /// 次に書き込む行
    pub fn row(&self) -> usize {
        self.row
    }

    fn write_row(&mut self, slots: &[u16]) {
        if self.row >= CAPTURE_HEIGHT {
            if self.dropped == 0 {
                log::warn!("Scanline below row {} dropped", CAPTURE_HEIGHT);
            }
            self.dropped += 1;
            self.row += 1;
            return;
        }
        let start = self.row * CAPTURE_WIDTH;
        let dest = &mut self.framebuffer[start..start + CAPTURE_WIDTH];
        for (px, &color) in dest.iter_mut().zip(slots) {
            *px = rgb888(color);
        }
        self.row += 1;
    }

    /// PNG (RGB 8bit) にエンコード
    pub fn encode_png<W: Write>(&self, w: W) -> Result<(), String> {
        let mut encoder = png::Encoder::new(w, CAPTURE_WIDTH as u32, CAPTURE_HEIGHT as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| format!("Failed to write PNG header: {}", e))?;

        let mut rgb_data = Vec::with_capacity(CAPTURE_WIDTH * CAPTURE_HEIGHT * 3);
        for pixel in self.framebuffer.iter() {
            rgb_data.push(((pixel >> 16) & 0xFF) as u8);
            rgb_data.push(((pixel >> 8) & 0xFF) as u8);
            rgb_data.push((pixel & 0xFF) as u8);
        }

        writer
            .write_image_data(&rgb_data)
            .map_err(|e| format!("Failed to write PNG data: {}", e))
    }

    /// PNGファイルとして保存
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let file = fs::File::create(&path)
            .map_err(|e| format!("Failed to create {:?}: {}", path.as_ref(), e))?;
        self.encode_png(BufWriter::new(file))?;
        log::info!("Frame saved to {:?}", path.as_ref());
        Ok(())
    }
}

impl SignalDriver for FrameCapture {
    fn prepare_frame(&mut self) {
        self.framebuffer.fill(0);
        self.row = 0;
        self.dropped = 0;
    }

    fn skip_lines(&mut self, n: u32) {
        self.row += n as usize;
    }

    fn prepare_scanline(&mut self) -> Scanline {
        match self.spare.take() {
            Some(mut sl) => {
                sl.clear();
                sl
            }
            None => Scanline::new(),
        }
    }

    fn submit_scanline(&mut self, sl: Scanline) {
        let slots = sl.expand();
        if slots.len() > CAPTURE_WIDTH {
            log::warn!("Scanline overruns raster: {} slots", slots.len());
        }

        self.write_row(&slots);
        for _ in 0..sl.repeat_count {
            self.write_row(&slots);
        }
        if sl.holds() {
            // 保持命令の次のラインは空白
            self.row += 1;
        }
        self.spare = Some(sl);
    }
}

/// テキスト行を空白で埋めるレンダラ
///
/// テキスト表示はこのクレートの範囲外のため、ライン数だけを合わせる。
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankText {
    pub scanline_emulation: bool,
}

impl TextRenderer for BlankText {
    fn render_text_line(&mut self, driver: &mut dyn SignalDriver, _row: u32) {
        for _ in 0..TEXT_ROW_LINES {
            let mut sl = driver.prepare_scanline();
            sl.finish(self.scanline_emulation);
            driver.submit_scanline(sl);
        }
    }
}
