//! Built-in UI text, stored as GB2312.

/// 延时相机
pub const APP_TITLE: &[u8] = b"\xd1\xd3\xca\xb1\xcf\xe0\xbb\xfa";
/// 初始化中
pub const INITIALIZING: &[u8] = b"\xb3\xf5\xca\xbc\xbb\xaf\xd6\xd0";
/// 就绪
pub const READY: &[u8] = b"\xbe\xcd\xd0\xf7";
/// WiFi关闭
pub const WIFI_OFF: &[u8] = b"WiFi\xb9\xd8\xb1\xd5";
/// K1菜单 K2开始
pub const KEY_HINT: &[u8] = b"K1\xb2\xcb\xb5\xa5 K2\xbf\xaa\xca\xbc";
/// 延时摄影
pub const TIMELAPSE: &[u8] = b"\xd1\xd3\xca\xb1\xc9\xe3\xd3\xb0";
/// 已启动
pub const STARTED: &[u8] = b"\xd2\xd1\xc6\xf4\xb6\xaf";
/// 已停止
pub const STOPPED: &[u8] = b"\xd2\xd1\xcd\xa3\xd6\xb9";
/// 拍摄中
pub const CAPTURING: &[u8] = b"\xc5\xc4\xc9\xe3\xd6\xd0";
/// 拍摄完成
pub const CAPTURE_DONE: &[u8] = b"\xc5\xc4\xc9\xe3\xcd\xea\xb3\xc9";
/// 已存SD卡
pub const SAVED_TO_SD: &[u8] = b"\xd2\xd1\xb4\xe6SD\xbf\xa8";
/// 深度睡眠
pub const DEEP_SLEEP: &[u8] = b"\xc9\xee\xb6\xc8\xcb\xaf\xc3\xdf";
/// 按BOOT唤醒
pub const WAKE_HINT: &[u8] = b"\xb0\xb4BOOT\xbb\xbd\xd0\xd1";
/// 低电量
pub const LOW_BATTERY: &[u8] = b"\xb5\xcd\xb5\xe7\xc1\xbf";

/// Main menu rows, in [`MenuAction`] order.
pub const MENU_ITEMS: [&[u8]; 6] = [
    b"\xbf\xaa\xca\xbc\xd1\xd3\xca\xb1", // 开始延时
    b"\xcd\xa3\xd6\xb9\xd1\xd3\xca\xb1", // 停止延时
    b"\xb5\xa5\xd5\xc5\xc5\xc4\xc9\xe3", // 单张拍摄
    b"\xca\xb5\xca\xb1\xd4\xa4\xc0\xc0", // 实时预览
    b"\xcf\xb5\xcd\xb3\xd0\xc5\xcf\xa2", // 系统信息
    b"\xc9\xee\xb6\xc8\xcb\xaf\xc3\xdf", // 深度睡眠
];

/// Actions behind [`MENU_ITEMS`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MenuAction {
    StartTimelapse,
    StopTimelapse,
    SingleCapture,
    LivePreview,
    SystemInfo,
    DeepSleep,
}

impl MenuAction {
    pub const ALL: [Self; 6] = [
        Self::StartTimelapse,
        Self::StopTimelapse,
        Self::SingleCapture,
        Self::LivePreview,
        Self::SystemInfo,
        Self::DeepSleep,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static [u8] {
        MENU_ITEMS[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gb2312::{looks_like_gb2312, utf8_or_gb2312_to_gb2312};

    fn every_chinese_unit_resolves(text: &[u8]) -> bool {
        let mut i = 0;
        while i < text.len() {
            if text[i] < 0x80 {
                i += 1;
                continue;
            }
            let (code, consumed) = utf8_or_gb2312_to_gb2312(&text[i..]);
            if code.is_none() {
                return false;
            }
            i += consumed;
        }
        true
    }

    #[test]
    fn literals_are_well_formed_gb2312() {
        let all = [
            APP_TITLE,
            INITIALIZING,
            READY,
            WIFI_OFF,
            KEY_HINT,
            TIMELAPSE,
            STARTED,
            STOPPED,
            CAPTURING,
            CAPTURE_DONE,
            SAVED_TO_SD,
            DEEP_SLEEP,
            WAKE_HINT,
            LOW_BATTERY,
        ];
        for text in all.iter().chain(MENU_ITEMS.iter()) {
            assert!(looks_like_gb2312(text), "{text:02X?}");
            assert!(every_chinese_unit_resolves(text), "{text:02X?}");
        }
    }

    #[test]
    fn menu_actions_line_up_with_labels() {
        assert_eq!(MenuAction::from_index(4), Some(MenuAction::SystemInfo));
        assert_eq!(MenuAction::from_index(6), None);
        assert_eq!(MenuAction::DeepSleep.label(), MENU_ITEMS[5]);
    }
}
