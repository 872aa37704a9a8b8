//! Directive grammar
//!
//! Every command-file line is parsed into one [`Directive`] before anything
//! touches state. Sub-grammars (progress, icon, list items, ...) are parsed
//! here too, so handlers only ever see typed values.

use std::path::PathBuf;

use tracing::debug;

use super::text::{self, APPEND_PREFIX};
use super::tokenizer::{dispatch_key, strip_key};
use crate::state::geometry::{parse_position, HorizontalPosition, VerticalPosition};
use crate::state::list::{LegacyStatus, ListItemCommand, RowSelector, RowUpdate, StatusIcon};
use crate::state::style::{Colour, FontWeight};

/// Which button a label or enable switch applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    One,
    Two,
    Info,
}

/// Body of a text directive that supports files and appending
#[derive(Debug, Clone, PartialEq)]
pub enum TextContent {
    Replace(String),
    Append(String),
    MarkdownFile(PathBuf),
}

impl TextContent {
    fn parse(value: &str) -> Self {
        let value = text::translate_escapes(value);
        if text::is_markdown_path(&value) {
            TextContent::MarkdownFile(PathBuf::from(value))
        } else if let Some(rest) = value.strip_prefix(APPEND_PREFIX) {
            TextContent::Append(rest.to_string())
        } else {
            TextContent::Replace(value)
        }
    }
}

/// One `key=value` pair of a `titlefont:` line
#[derive(Debug, Clone, PartialEq)]
pub enum FontSetting {
    /// `None` when the size isn't numeric; the default size is used
    Size(Option<f64>),
    Weight(FontWeight),
    Colour(Colour),
    Name(String),
    Shadow(bool),
    Unknown(String),
}

impl FontSetting {
    fn parse(pair: &str) -> Self {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => return FontSetting::Unknown(pair.to_string()),
        };
        match key {
            "size" => FontSetting::Size(text::parse_number(value)),
            "weight" => FontSetting::Weight(FontWeight::parse(value)),
            "colour" | "color" => FontSetting::Colour(Colour::parse(value)),
            "name" => FontSetting::Name(value.to_string()),
            "shadow" => FontSetting::Shadow(text::parse_bool(value)),
            _ => FontSetting::Unknown(key.to_string()),
        }
    }
}

/// `progress:` sub-commands
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressCommand {
    Increment(f64),
    Indeterminate,
    Complete,
    Hide,
    Show,
    /// Absolute value; `None` keeps the current value
    Set(Option<f64>),
}

impl ProgressCommand {
    fn parse(value: &str) -> Self {
        match value.split(' ').next().unwrap_or_default() {
            "increment" => {
                let amount = value.rsplit(' ').next().and_then(text::parse_number);
                ProgressCommand::Increment(amount.unwrap_or(1.0))
            }
            "reset" | "indeterminate" => ProgressCommand::Indeterminate,
            "complete" => ProgressCommand::Complete,
            "delete" | "remove" | "hide" => ProgressCommand::Hide,
            "create" | "show" => ProgressCommand::Show,
            _ if value == "0" => ProgressCommand::Indeterminate,
            _ => ProgressCommand::Set(text::parse_number(value)),
        }
    }
}

/// `icon:` forms
#[derive(Debug, Clone, PartialEq)]
pub enum IconCommand {
    /// `None` resets to the default icon width
    Size(Option<f64>),
    Centre,
    Left,
    Hide,
    Show(String),
}

impl IconCommand {
    fn parse(value: &str) -> Option<Self> {
        if let Some(size) = value.strip_prefix("size:") {
            let size = size.trim();
            if size.is_empty() {
                return Some(IconCommand::Size(None));
            }
            return match text::parse_number(size) {
                Some(size) => Some(IconCommand::Size(Some(size))),
                None => {
                    debug!("Ignoring non-numeric icon size: {}", size);
                    None
                }
            };
        }
        Some(match value {
            "centre" | "center" => IconCommand::Centre,
            "left" | "default" => IconCommand::Left,
            "none" => IconCommand::Hide,
            path => IconCommand::Show(path.to_string()),
        })
    }
}

/// `bannertext:` forms
#[derive(Debug, Clone, PartialEq)]
pub enum BannerTextCommand {
    Enable,
    Disable,
    Shadow,
    Text(String),
}

/// `image:` forms
#[derive(Debug, Clone, PartialEq)]
pub enum ImageCommand {
    Show,
    Hide,
    Clear,
    Add(String),
}

/// `list:` forms
#[derive(Debug, Clone, PartialEq)]
pub enum ListCommand {
    Clear,
    Show,
    Hide,
    Replace(Vec<String>),
}

/// `video:` and `webcontent:` forms
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCommand {
    Clear,
    Load(String),
}

impl MediaCommand {
    fn parse(value: &str) -> Self {
        if value == "none" {
            MediaCommand::Clear
        } else {
            MediaCommand::Load(value.to_string())
        }
    }
}

/// A parsed command-file line
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Position(VerticalPosition, HorizontalPosition),
    /// `None` when the value isn't numeric
    Width(Option<f64>),
    Height(Option<f64>),
    Title(String),
    TitleFont(Vec<FontSetting>),
    Message(TextContent),
    Alignment(String),
    Progress(ProgressCommand),
    ProgressText(String),
    ButtonText(Button, String),
    ButtonEnabled(Button, bool),
    /// `None` hides the info text without clearing it
    InfoText(Option<String>),
    InfoBox(TextContent),
    HelpMessage(String),
    Icon(IconCommand),
    IconAlpha(f64),
    /// `None` hides the overlay
    OverlayIcon(Option<String>),
    /// `None` removes the banner
    BannerImage(Option<String>),
    BannerText(BannerTextCommand),
    Image(ImageCommand),
    ImageCaption(String),
    List(ListCommand),
    ListItem(ListItemCommand),
    Video(MediaCommand),
    WebContent(MediaCommand),
    Activate,
    Quit,
}

impl Directive {
    /// Parse one trimmed line; `None` for keys outside the vocabulary
    pub fn parse(line: &str) -> Option<Self> {
        let key = dispatch_key(line);
        let value = strip_key(line);

        let directive = match key.as_str() {
            "position:" => {
                let (vertical, horizontal) = parse_position(value);
                Directive::Position(vertical, horizontal)
            }
            "width:" => Directive::Width(text::parse_number(value)),
            "height:" => Directive::Height(text::parse_number(value)),
            "title:" => Directive::Title(value.to_string()),
            "titlefont:" => Directive::TitleFont(
                value
                    .split_whitespace()
                    .map(FontSetting::parse)
                    .collect(),
            ),
            "message:" => Directive::Message(TextContent::parse(value)),
            "alignment:" => Directive::Alignment(value.to_string()),
            "progress:" => Directive::Progress(ProgressCommand::parse(value)),
            "progresstext:" => Directive::ProgressText(value.to_string()),
            "button1text:" => Directive::ButtonText(Button::One, value.to_string()),
            "button2text:" => Directive::ButtonText(Button::Two, value.to_string()),
            "infobuttontext:" => Directive::ButtonText(Button::Info, value.to_string()),
            "button1:" => Directive::ButtonEnabled(Button::One, value != "disable"),
            "button2:" => Directive::ButtonEnabled(Button::Two, value != "disable"),
            "infobutton:" => Directive::ButtonEnabled(Button::Info, value != "disable"),
            "infotext:" => Directive::InfoText(match value {
                "disable" => None,
                info => Some(text::translate_escapes(info)),
            }),
            "infobox:" => Directive::InfoBox(TextContent::parse(value)),
            "helpmessage:" => Directive::HelpMessage(text::translate_escapes(value)),
            "icon:" => Directive::Icon(IconCommand::parse(value)?),
            "iconalpha:" => Directive::IconAlpha(text::parse_number(value).unwrap_or(1.0)),
            "overlayicon:" => Directive::OverlayIcon(none_sentinel(value)),
            "bannerimage:" => Directive::BannerImage(none_sentinel(value)),
            "bannertext:" => Directive::BannerText(match value {
                "enable" => BannerTextCommand::Enable,
                "disable" => BannerTextCommand::Disable,
                "shadow" => BannerTextCommand::Shadow,
                banner => BannerTextCommand::Text(banner.to_string()),
            }),
            "image:" => Directive::Image(match value.to_lowercase().as_str() {
                "show" => ImageCommand::Show,
                "hide" => ImageCommand::Hide,
                "clear" => ImageCommand::Clear,
                _ => ImageCommand::Add(value.to_string()),
            }),
            "imagecaption:" => Directive::ImageCaption(value.to_string()),
            "list:" => Directive::List(match value {
                "clear" => ListCommand::Clear,
                "show" => ListCommand::Show,
                "hide" => ListCommand::Hide,
                titles => ListCommand::Replace(
                    titles.split(',').map(|t| t.trim().to_string()).collect(),
                ),
            }),
            "listitem:" | "list-item:" => Directive::ListItem(parse_list_item(value)),
            "video:" => Directive::Video(MediaCommand::parse(value)),
            "webcontent:" => Directive::WebContent(MediaCommand::parse(value)),
            "activate:" => Directive::Activate,
            "quit:" => Directive::Quit,
            _ => return None,
        };

        Some(directive)
    }
}

fn none_sentinel(value: &str) -> Option<String> {
    if value == "none" {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse both list-item syntaxes of a line
///
/// `B: success` is the legacy form; `title: B, status: success` the
/// structured one. Which one applies depends on the rows present when the
/// line is handled, so both are kept.
pub fn parse_list_item(value: &str) -> ListItemCommand {
    let segments: Vec<&str> = value.split(": ").collect();
    let legacy = match (segments.first(), segments.last()) {
        (Some(title), Some(status)) if segments.len() > 1 => Some(LegacyStatus {
            title: title.to_string(),
            status: status.to_string(),
        }),
        _ => None,
    };

    let mut update = RowUpdate::default();
    for pair in value.split(',') {
        let (key, field) = match pair.split_once(": ") {
            Some((key, field)) => (key, Some(field.trim())),
            // trailing `status:` lost its space to line trimming
            None => match pair.trim().strip_suffix(':') {
                Some(key) => (key, Some("")),
                None => (pair, None),
            },
        };
        let key = key.trim().to_lowercase();

        match (key.as_str(), field) {
            ("delete", _) => update.delete = true,
            ("add", _) => update.add = true,
            ("index", Some(field)) => match field.parse::<i64>() {
                Ok(index) => update.selectors.push(RowSelector::Index(index)),
                Err(_) => debug!("Ignoring non-numeric list index: {}", field),
            },
            ("title", Some(field)) => update.selectors.push(RowSelector::Title(field.to_string())),
            ("subtitle", Some(field)) => update.subtitle = Some(field.to_string()),
            ("icon", Some(field)) => update.icon = Some(field.to_string()),
            ("statustext", Some(field)) => update.status_text = Some(field.to_string()),
            ("status", Some("")) => update.status_icon = Some(None),
            ("status", Some(field)) => match StatusIcon::parse(field) {
                Some(icon) => update.status_icon = Some(Some(icon)),
                None => debug!("Ignoring unknown list status: {}", field),
            },
            ("progress", Some(field)) => {
                update.progress = Some(text::parse_number(field).unwrap_or_default());
                update.status_icon = Some(Some(StatusIcon::Progress));
            }
            _ => debug!("Ignoring list item key: {}", key),
        }
    }

    ListItemCommand { legacy, update }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key() {
        assert_eq!(Directive::parse("frobnicate: yes"), None);
        assert_eq!(Directive::parse("title:NoSpace"), None);
    }

    #[test]
    fn test_key_is_case_insensitive() {
        assert_eq!(
            Directive::parse("TITLE: Hello World"),
            Some(Directive::Title("Hello World".to_string()))
        );
    }

    #[test]
    fn test_width_requires_number() {
        assert_eq!(Directive::parse("width: 500"), Some(Directive::Width(Some(500.0))));
        assert_eq!(Directive::parse("width: wide"), Some(Directive::Width(None)));
    }

    #[test]
    fn test_titlefont_pairs() {
        let parsed = Directive::parse("titlefont: size=20 weight=bold colour=#FF0000 shadow=true blink=1");
        assert_eq!(
            parsed,
            Some(Directive::TitleFont(vec![
                FontSetting::Size(Some(20.0)),
                FontSetting::Weight(FontWeight::Bold),
                FontSetting::Colour(Colour::Rgb(255, 0, 0)),
                FontSetting::Shadow(true),
                FontSetting::Unknown("blink".to_string()),
            ]))
        );
    }

    #[test]
    fn test_message_forms() {
        assert_eq!(
            Directive::parse("message: one\\ntwo<br>three"),
            Some(Directive::Message(TextContent::Replace("one\ntwo  \nthree".to_string())))
        );
        assert_eq!(
            Directive::parse("message: +  second line"),
            Some(Directive::Message(TextContent::Append(" second line".to_string())))
        );
        assert_eq!(
            Directive::parse("message: /tmp/notes.md"),
            Some(Directive::Message(TextContent::MarkdownFile(PathBuf::from("/tmp/notes.md"))))
        );
    }

    #[test]
    fn test_progress_commands() {
        let parse = |line: &str| match Directive::parse(line) {
            Some(Directive::Progress(command)) => command,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(parse("progress: increment"), ProgressCommand::Increment(1.0));
        assert_eq!(parse("progress: increment 5"), ProgressCommand::Increment(5.0));
        assert_eq!(parse("progress: reset"), ProgressCommand::Indeterminate);
        assert_eq!(parse("progress: indeterminate"), ProgressCommand::Indeterminate);
        assert_eq!(parse("progress: 0"), ProgressCommand::Indeterminate);
        assert_eq!(parse("progress: complete"), ProgressCommand::Complete);
        assert_eq!(parse("progress: remove"), ProgressCommand::Hide);
        assert_eq!(parse("progress: create"), ProgressCommand::Show);
        assert_eq!(parse("progress: 42"), ProgressCommand::Set(Some(42.0)));
        assert_eq!(parse("progress: lots"), ProgressCommand::Set(None));
    }

    #[test]
    fn test_button_status() {
        assert_eq!(
            Directive::parse("button1: disable"),
            Some(Directive::ButtonEnabled(Button::One, false))
        );
        assert_eq!(
            Directive::parse("button2: whatever"),
            Some(Directive::ButtonEnabled(Button::Two, true))
        );
    }

    #[test]
    fn test_icon_forms() {
        assert_eq!(
            Directive::parse("icon: size: 64"),
            Some(Directive::Icon(IconCommand::Size(Some(64.0))))
        );
        assert_eq!(
            Directive::parse("icon: size:"),
            Some(Directive::Icon(IconCommand::Size(None)))
        );
        assert_eq!(Directive::parse("icon: size: big"), None);
        assert_eq!(Directive::parse("icon: center"), Some(Directive::Icon(IconCommand::Centre)));
        assert_eq!(Directive::parse("icon: default"), Some(Directive::Icon(IconCommand::Left)));
        assert_eq!(Directive::parse("icon: none"), Some(Directive::Icon(IconCommand::Hide)));
        assert_eq!(
            Directive::parse("icon: /tmp/icon.png"),
            Some(Directive::Icon(IconCommand::Show("/tmp/icon.png".to_string())))
        );
    }

    #[test]
    fn test_icon_alpha_fallback() {
        assert_eq!(Directive::parse("iconalpha: 0.5"), Some(Directive::IconAlpha(0.5)));
        assert_eq!(Directive::parse("iconalpha: clear"), Some(Directive::IconAlpha(1.0)));
    }

    #[test]
    fn test_list_titles_are_trimmed() {
        assert_eq!(
            Directive::parse("list: A, B ,C"),
            Some(Directive::List(ListCommand::Replace(vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
            ])))
        );
        assert_eq!(Directive::parse("list: clear"), Some(Directive::List(ListCommand::Clear)));
    }

    #[test]
    fn test_list_item_legacy_form() {
        let command = parse_list_item("Step 2: success");
        assert_eq!(
            command.legacy,
            Some(LegacyStatus {
                title: "Step 2".to_string(),
                status: "success".to_string(),
            })
        );
    }

    #[test]
    fn test_list_item_structured_form() {
        let command = parse_list_item("index: 1, subtitle: Copying, progress: 40, add");
        assert_eq!(command.update.selectors, vec![RowSelector::Index(1)]);
        assert_eq!(command.update.subtitle.as_deref(), Some("Copying"));
        assert_eq!(command.update.progress, Some(40.0));
        assert_eq!(command.update.status_icon, Some(Some(StatusIcon::Progress)));
        assert!(command.update.add);
        assert!(!command.update.delete);
        assert_eq!(command.update.icon, None);
    }

    #[test]
    fn test_list_item_trailing_empty_status() {
        let command = parse_list_item("title: B, status:");
        assert_eq!(command.update.status_icon, Some(None));
    }

    #[test]
    fn test_list_item_without_separator_has_no_legacy_form() {
        let command = parse_list_item("delete");
        assert_eq!(command.legacy, None);
        assert!(command.update.delete);
    }

    #[test]
    fn test_list_item_aliases() {
        assert!(matches!(
            Directive::parse("list-item: title: B, status: success"),
            Some(Directive::ListItem(_))
        ));
        assert!(matches!(
            Directive::parse("listitem: B: success"),
            Some(Directive::ListItem(_))
        ));
    }

    #[test]
    fn test_media_sentinels() {
        assert_eq!(Directive::parse("video: none"), Some(Directive::Video(MediaCommand::Clear)));
        assert_eq!(
            Directive::parse("webcontent: https://example.com"),
            Some(Directive::WebContent(MediaCommand::Load("https://example.com".to_string())))
        );
        assert_eq!(Directive::parse("overlayicon: none"), Some(Directive::OverlayIcon(None)));
    }

    #[test]
    fn test_bare_keys() {
        assert_eq!(Directive::parse("quit:"), Some(Directive::Quit));
        assert_eq!(Directive::parse("activate:"), Some(Directive::Activate));
    }
}
