//! Fixed escape-code fragments shared by the output-side modules.

pub(crate) const ESC: &str = "\x1b";
pub(crate) const CSI: &str = "\x1b[";
/// Kitty graphics introducer (APC `G`)
pub(crate) const GFX: &str = "\x1b_G";
/// String Terminator, 7-bit form
pub(crate) const ST: &str = "\x1b\\";

/// Send C1 controls as 7-bit escape sequences
pub(crate) const S7C1T: &str = "\x1b F";
pub(crate) const SAVE_CURSOR: &str = "\x1b7";
pub(crate) const RESTORE_CURSOR: &str = "\x1b8";
pub(crate) const SAVE_PRIVATE_MODE_VALUES: &str = "\x1b[?s";
pub(crate) const RESTORE_PRIVATE_MODE_VALUES: &str = "\x1b[?r";
pub(crate) const SAVE_COLORS: &str = "\x1b[#P";
pub(crate) const RESTORE_COLORS: &str = "\x1b[#Q";
pub(crate) const DECSACE_DEFAULT_REGION_SELECT: &str = "\x1b[*x";
pub(crate) const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";
pub(crate) const RESET_IRM: &str = "\x1b[4l";
