//! Launch options table read and overwritten by directives

use serde::{Deserialize, Serialize};

/// One launch option: its value and whether it is shown
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandLineOption {
    pub value: String,
    pub present: bool,
}

impl CommandLineOption {
    /// Option given on the command line with a value
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            present: true,
        }
    }

    /// Set the value and show it
    pub fn show(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.present = true;
    }

    /// Hide the option and clear its value
    pub fn clear(&mut self) {
        self.value.clear();
        self.present = false;
    }
}

/// Every option a directive can touch
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DialogOptions {
    pub title: CommandLineOption,
    pub message: CommandLineOption,
    pub message_alignment: CommandLineOption,
    /// `value` holds the progress total
    pub progress_bar: CommandLineOption,
    pub progress_text: CommandLineOption,
    pub button1_text: CommandLineOption,
    pub button1_disabled: CommandLineOption,
    pub button2_text: CommandLineOption,
    pub button2_disabled: CommandLineOption,
    pub info_button_text: CommandLineOption,
    pub info_button_disabled: CommandLineOption,
    pub info_text: CommandLineOption,
    pub info_box: CommandLineOption,
    pub help_message: CommandLineOption,
    pub icon: CommandLineOption,
    pub centre_icon: CommandLineOption,
    pub icon_size: CommandLineOption,
    pub icon_alpha: CommandLineOption,
    pub overlay_icon: CommandLineOption,
    pub banner_image: CommandLineOption,
    pub banner_text: CommandLineOption,
    pub banner_title: CommandLineOption,
    pub main_image: CommandLineOption,
    pub main_image_caption: CommandLineOption,
    pub list_item: CommandLineOption,
    pub video: CommandLineOption,
    pub autoplay: CommandLineOption,
    pub webcontent: CommandLineOption,
    pub position_offset: CommandLineOption,
    pub timer_bar: CommandLineOption,
    pub hide_timer_bar: CommandLineOption,
}
