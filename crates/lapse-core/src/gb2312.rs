//! GB2312 code space helpers and the small UTF-8 bridge used by the UI.
//!
//! Only the two-byte GB2312 range is modelled. Chinese text may reach the
//! renderer either as raw GB2312 pairs or as UTF-8; UTF-8 input is mapped
//! through a fixed table that covers the glyphs of the built-in UI strings.

/// First valid byte of either half of a GB2312 pair.
pub const GB_MIN: u8 = 0xA1;
/// Last valid high byte (row 87).
pub const GB_HI_MAX: u8 = 0xF7;
/// Last valid low byte.
pub const GB_LO_MAX: u8 = 0xFE;
/// Cells per GB2312 row.
pub const CELLS_PER_ROW: u16 = 94;

/// A validated two-byte GB2312 code.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Gb2312Code {
    hi: u8,
    lo: u8,
}

impl Gb2312Code {
    /// Builds a code, rejecting pairs outside the GB2312 grid.
    pub const fn new(hi: u8, lo: u8) -> Option<Self> {
        if is_valid_gb2312(hi, lo) {
            Some(Self { hi, lo })
        } else {
            None
        }
    }

    pub const fn hi(self) -> u8 {
        self.hi
    }

    pub const fn lo(self) -> u8 {
        self.lo
    }

    pub const fn bytes(self) -> [u8; 2] {
        [self.hi, self.lo]
    }

    /// Position in a row-major font file before any dialect adjustment.
    pub const fn index(self) -> u16 {
        (self.hi - GB_MIN) as u16 * CELLS_PER_ROW + (self.lo - GB_MIN) as u16
    }
}

/// Returns `true` for pairs inside the GB2312 grid.
#[inline]
pub const fn is_valid_gb2312(hi: u8, lo: u8) -> bool {
    hi >= GB_MIN && hi <= GB_HI_MAX && lo >= GB_MIN && lo <= GB_LO_MAX
}

/// Linear glyph index of a pair, or `None` for invalid pairs.
#[inline]
pub const fn gb_index(hi: u8, lo: u8) -> Option<u16> {
    match Gb2312Code::new(hi, lo) {
        Some(code) => Some(code.index()),
        None => None,
    }
}

/// Decodes one UTF-8 scalar from the head of `bytes`.
///
/// Returns the code point (or `None` when malformed) and the number of bytes
/// consumed. Every inspected byte is consumed, so a caller looping on the
/// result always makes progress on non-empty input.
pub fn decode_utf8_char(bytes: &[u8]) -> (Option<u32>, usize) {
    let Some(&lead) = bytes.first() else {
        return (None, 0);
    };

    let (continuations, mut value) = match lead {
        0x00..=0x7F => return (Some(lead as u32), 1),
        _ if lead & 0xE0 == 0xC0 => (1, (lead & 0x1F) as u32),
        _ if lead & 0xF0 == 0xE0 => (2, (lead & 0x0F) as u32),
        _ if lead & 0xF8 == 0xF0 => (3, (lead & 0x07) as u32),
        _ => return (None, 1),
    };

    for i in 1..=continuations {
        let Some(&b) = bytes.get(i) else {
            return (None, i);
        };
        if b & 0xC0 != 0x80 {
            return (None, i + 1);
        }
        value = (value << 6) | (b & 0x3F) as u32;
    }

    (Some(value), continuations + 1)
}

/// Code points of the built-in UI strings and their GB2312 pairs.
const COMMON_MAP: [(u16, u8, u8); 46] = [
    (0x5F00, 0xBF, 0xAA), // 开
    (0x59CB, 0xCA, 0xBC), // 始
    (0x5EF6, 0xD1, 0xD3), // 延
    (0x65F6, 0xCA, 0xB1), // 时
    (0x505C, 0xCD, 0xA3), // 停
    (0x6B62, 0xD6, 0xB9), // 止
    (0x5355, 0xB5, 0xA5), // 单
    (0x6B21, 0xB4, 0xCE), // 次
    (0x5F20, 0xD5, 0xC5), // 张
    (0x62CD, 0xC5, 0xC4), // 拍
    (0x6444, 0xC9, 0xE3), // 摄
    (0x5F71, 0xD3, 0xB0), // 影
    (0x5B9E, 0xCA, 0xB5), // 实
    (0x9884, 0xD4, 0xA4), // 预
    (0x89C8, 0xC0, 0xC0), // 览
    (0x7CFB, 0xCF, 0xB5), // 系
    (0x7EDF, 0xCD, 0xB3), // 统
    (0x4FE1, 0xD0, 0xC5), // 信
    (0x606F, 0xCF, 0xA2), // 息
    (0x6DF1, 0xC9, 0xEE), // 深
    (0x5EA6, 0xB6, 0xC8), // 度
    (0x7761, 0xCB, 0xAF), // 睡
    (0x7720, 0xC3, 0xDF), // 眠
    (0x5DF2, 0xD2, 0xD1), // 已
    (0x542F, 0xC6, 0xF4), // 启
    (0x52A8, 0xB6, 0xAF), // 动
    (0x4E2D, 0xD6, 0xD0), // 中
    (0x5B8C, 0xCD, 0xEA), // 完
    (0x6210, 0xB3, 0xC9), // 成
    (0x5B58, 0xB4, 0xE6), // 存
    (0x5361, 0xBF, 0xA8), // 卡
    (0x4F4E, 0xB5, 0xCD), // 低
    (0x7535, 0xB5, 0xE7), // 电
    (0x91CF, 0xC1, 0xBF), // 量
    (0x5C31, 0xBE, 0xCD), // 就
    (0x7EEA, 0xD0, 0xF7), // 绪
    (0x5173, 0xB9, 0xD8), // 关
    (0x95ED, 0xB1, 0xD5), // 闭
    (0x6309, 0xB0, 0xB4), // 按
    (0x5524, 0xBB, 0xBD), // 唤
    (0x9192, 0xD0, 0xD1), // 醒
    (0x83DC, 0xB2, 0xCB), // 菜
    (0x76F8, 0xCF, 0xE0), // 相
    (0x673A, 0xBB, 0xFA), // 机
    (0x521D, 0xB3, 0xF5), // 初
    (0x5316, 0xBB, 0xAF), // 化
];

/// Maps a code point through the built-in table.
pub fn unicode_to_gb2312(codepoint: u32) -> Option<Gb2312Code> {
    let codepoint = u16::try_from(codepoint).ok()?;
    COMMON_MAP
        .iter()
        .find(|(cp, _, _)| *cp == codepoint)
        .and_then(|&(_, hi, lo)| Gb2312Code::new(hi, lo))
}

/// Resolves the next Chinese unit from input that may be GB2312 or UTF-8.
///
/// A valid raw pair at the head wins; otherwise one UTF-8 character is
/// decoded and looked up. The consumed count is returned on failure too.
pub fn utf8_or_gb2312_to_gb2312(bytes: &[u8]) -> (Option<Gb2312Code>, usize) {
    if let [hi, lo, ..] = *bytes
        && let Some(code) = Gb2312Code::new(hi, lo)
    {
        return (Some(code), 2);
    }

    let (codepoint, consumed) = decode_utf8_char(bytes);
    let code = codepoint
        .filter(|cp| (0x80..=0xFFFF).contains(cp))
        .and_then(unicode_to_gb2312);
    (code, consumed)
}

/// Heuristic: does this byte string carry raw GB2312 rather than UTF-8?
///
/// Scans left to right. A `0xE0..=0xEF` byte followed by a continuation byte
/// reads as a UTF-8 CJK lead and answers `false`; two consecutive bytes in
/// `0xA1..=0xFE` answer `true`. Input with neither pattern is not GB2312.
///
/// GB2312 pairs whose high byte is `0xE0..=0xEF` and low byte is
/// `0xA1..=0xBF` are indistinguishable from UTF-8 here and classify as UTF-8
/// when they come first.
pub fn looks_like_gb2312(bytes: &[u8]) -> bool {
    let is_gb_byte = |b: u8| (GB_MIN..=GB_LO_MAX).contains(&b);

    for pair in bytes.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if (0xE0..=0xEF).contains(&a) && (0x80..=0xBF).contains(&b) {
            return false;
        }
        if is_gb_byte(a) && is_gb_byte(b) {
            return true;
        }
    }

    false
}
