//! Hi-Resグラフィックスページ
//!
//! Main RAM / Aux RAMのHi-Resページと、ラインからメモリオフセットへの変換

/// Hi-Resページのサイズ
pub const HIRES_PAGE_SIZE: usize = 0x2000;
/// 1ラインのバイト数
pub const LINE_BYTES: usize = 40;
/// 画面のライン数
pub const HIRES_LINES: usize = 192;

const HIRES_PAGE1: usize = 0x2000;
const HIRES_PAGE2: usize = 0x4000;

/// Hi-Res行のメモリオフセットを計算
///
/// ライン番号のビットをインターリーブして配置される:
///   bit 0-2: 1KB単位
///   bit 3-5: 128バイト単位
///   bit 6-7: 40バイト単位
#[inline(always)]
pub const fn hires_line_offset(line: usize) -> usize {
    ((line & 0x07) << 10) | ((line & 0x38) << 4) | (((line & 0xc0) >> 6) * 40)
}

/// RAMバンク
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    Main,
    Aux,
}

/// Hi-Resページを提供するメモリ
pub trait HiresPages {
    /// 指定バンクのHi-Resページ1または2（`HIRES_PAGE_SIZE` バイト）
    fn hires_page(&self, bank: Bank, page2: bool) -> &[u8];
}

/// Apple IIe のMain/Aux RAM
#[derive(Clone)]
pub struct Memory {
    pub main_ram: Box<[u8; 65536]>,
    pub aux_ram: Box<[u8; 65536]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            main_ram: Box::new([0; 65536]),
            aux_ram: Box::new([0; 65536]),
        }
    }

    /// ダンプを読み込む
    ///
    /// 8KBならHi-Resページへ、64KBならRAM全体へ配置する。
    pub fn load_dump(&mut self, bank: Bank, page2: bool, data: &[u8]) -> Result<(), String> {
        let ram = match bank {
            Bank::Main => &mut self.main_ram,
            Bank::Aux => &mut self.aux_ram,
        };
        match data.len() {
            HIRES_PAGE_SIZE => {
                let base = if page2 { HIRES_PAGE2 } else { HIRES_PAGE1 };
                ram[base..base + HIRES_PAGE_SIZE].copy_from_slice(data);
            }
            65536 => ram.copy_from_slice(data),
            n => {
                return Err(format!(
                    "Unsupported dump size: {} bytes (expected {} or 65536)",
                    n, HIRES_PAGE_SIZE
                ))
            }
        }
        log::info!("Loaded {:?} RAM dump ({} bytes)", bank, data.len());
        Ok(())
    }
}

impl HiresPages for Memory {
    fn hires_page(&self, bank: Bank, page2: bool) -> &[u8] {
        let base = if page2 { HIRES_PAGE2 } else { HIRES_PAGE1 };
        let ram = match bank {
            Bank::Main => &self.main_ram,
            Bank::Aux => &self.aux_ram,
        };
        &ram[base..base + HIRES_PAGE_SIZE]
    }
}

/// 1フレームの間参照する表示ページ
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    /// Main RAM（ダブルHi-Resでは偶数側）
    pub main: &'a [u8],
    /// Aux RAM（ダブルHi-Resでは奇数側）
    pub aux: &'a [u8],
}

impl<'a> PageView<'a> {
    /// PAGE2が有効でも80STOREが有効ならページ1を表示する
    pub fn select<M: HiresPages + ?Sized>(memory: &'a M, page2: bool, store_80: bool) -> Self {
        let page2 = page2 && !store_80;
        PageView {
            main: memory.hires_page(Bank::Main, page2),
            aux: memory.hires_page(Bank::Aux, page2),
        }
    }

    /// Main側の1ライン40バイト
    #[inline(always)]
    pub fn main_line(&self, line: usize) -> &'a [u8] {
        let offset = hires_line_offset(line);
        &self.main[offset..offset + LINE_BYTES]
    }

    /// Aux側の1ライン40バイト
    #[inline(always)]
    pub fn aux_line(&self, line: usize) -> &'a [u8] {
        let offset = hires_line_offset(line);
        &self.aux[offset..offset + LINE_BYTES]
    }
}
