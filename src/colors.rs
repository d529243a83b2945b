use colored::CustomColor;
use std::sync::LazyLock;

pub static WARNING_COLOR: LazyLock<CustomColor> = LazyLock::new(|| CustomColor::new(187, 142, 35));
pub static ERROR_COLOR: LazyLock<CustomColor> = LazyLock::new(|| CustomColor::new(220, 60, 60));
pub static SYMBOL_COLOR: LazyLock<CustomColor> = LazyLock::new(|| CustomColor::new(0, 169, 233));
pub static GENERAL_TEXT_COLOR: LazyLock<CustomColor> =
    LazyLock::new(|| CustomColor::new(160, 160, 160));
