//! One handler per directive family
//!
//! Handlers mutate [`DialogState`] in place and push any side effect the
//! host has to carry out. Malformed values never fail; they leave the state
//! as it was.

use tracing::{debug, warn};

use crate::app::events::{Effect, EXIT_CODE_COMMAND_QUIT};
use crate::protocol::directive::{
    BannerTextCommand, Button, Directive, FontSetting, IconCommand, ImageCommand, ListCommand,
    MediaCommand, ProgressCommand, TextContent,
};
use crate::protocol::{media, text};
use crate::state::list::ListItemCommand;
use crate::state::style::DEFAULT_TITLE_FONT_SIZE;
use crate::state::{
    Colour, CommandLineOption, DialogState, HorizontalPosition, ListItems, MainImage,
    VerticalPosition, DEFAULT_ICON_SIZE,
};

/// Apply one directive
pub fn apply(state: &mut DialogState, directive: Directive, effects: &mut Vec<Effect>) {
    match directive {
        Directive::Position(vertical, horizontal) => {
            handle_position(state, vertical, horizontal, effects)
        }
        Directive::Width(width) => handle_width(state, width, effects),
        Directive::Height(height) => handle_height(state, height, effects),
        Directive::Title(title) => state.options.title.value = title,
        Directive::TitleFont(settings) => handle_title_font(state, settings),
        Directive::Message(content) => handle_message(state, content),
        Directive::Alignment(alignment) => state.options.message_alignment.value = alignment,
        Directive::Progress(command) => handle_progress(state, command),
        Directive::ProgressText(label) => state.options.progress_text.show(label),
        Directive::ButtonText(button, label) => button_text(state, button).value = label,
        Directive::ButtonEnabled(button, enabled) => {
            button_disabled(state, button).present = !enabled
        }
        Directive::InfoText(info) => handle_info_text(state, info),
        Directive::InfoBox(content) => handle_info_box(state, content),
        Directive::HelpMessage(help) => state.options.help_message.show(help),
        Directive::Icon(command) => handle_icon(state, command),
        Directive::IconAlpha(alpha) => state.icon_alpha = alpha,
        Directive::OverlayIcon(overlay) => handle_overlay_icon(state, overlay),
        Directive::BannerImage(image) => handle_banner_image(state, image),
        Directive::BannerText(command) => handle_banner_text(state, command),
        Directive::Image(command) => handle_image(state, command),
        Directive::ImageCaption(caption) => handle_image_caption(state, caption),
        Directive::List(command) => handle_list(state, command),
        Directive::ListItem(command) => handle_list_item(state, &command),
        Directive::Video(command) => handle_video(state, command),
        Directive::WebContent(command) => handle_webcontent(state, command),
        Directive::Activate => effects.push(Effect::Activate),
        Directive::Quit => effects.push(Effect::Quit {
            exit_code: EXIT_CODE_COMMAND_QUIT,
        }),
    }
}

fn reposition(state: &DialogState) -> Effect {
    Effect::Reposition {
        width: state.window.width,
        height: state.window.frame_height(),
        vertical: state.window.vertical,
        horizontal: state.window.horizontal,
        offset: state.window.offset,
    }
}

fn handle_position(
    state: &mut DialogState,
    vertical: VerticalPosition,
    horizontal: HorizontalPosition,
    effects: &mut Vec<Effect>,
) {
    state.window.vertical = vertical;
    state.window.horizontal = horizontal;
    effects.push(reposition(state));
    effects.push(Effect::Activate);
}

fn handle_width(state: &mut DialogState, width: Option<f64>, effects: &mut Vec<Effect>) {
    match width {
        Some(width) => {
            state.window.width = width;
            effects.push(reposition(state));
        }
        None => debug!("Ignoring non-numeric width"),
    }
}

fn handle_height(state: &mut DialogState, height: Option<f64>, effects: &mut Vec<Effect>) {
    match height {
        Some(height) => {
            state.window.height = height;
            effects.push(reposition(state));
        }
        None => debug!("Ignoring non-numeric height"),
    }
}

fn handle_title_font(state: &mut DialogState, settings: Vec<FontSetting>) {
    let font = &mut state.title_font;
    for setting in settings {
        match setting {
            FontSetting::Size(size) => font.size = size.unwrap_or(DEFAULT_TITLE_FONT_SIZE),
            FontSetting::Weight(weight) => font.weight = weight,
            FontSetting::Colour(colour) => font.colour = colour,
            FontSetting::Name(name) => font.name = Some(name),
            FontSetting::Shadow(shadow) => font.shadow = shadow,
            FontSetting::Unknown(key) => debug!("Unknown title font parameter: {}", key),
        }
    }
}

/// Apply a text body to an option; `false` if a Markdown file couldn't be read
fn apply_text_content(option: &mut CommandLineOption, content: TextContent) -> bool {
    match content {
        TextContent::Replace(value) => option.value = value,
        TextContent::Append(addition) => option.value = text::append_line(&option.value, &addition),
        TextContent::MarkdownFile(path) => match text::load_markdown(&path) {
            Ok(markdown) => option.value = markdown,
            Err(e) => {
                warn!("{:#}", e);
                return false;
            }
        },
    }
    true
}

fn handle_message(state: &mut DialogState, content: TextContent) {
    if !apply_text_content(&mut state.options.message, content) {
        return;
    }
    // The message owns the content area
    state.options.main_image.present = false;
    state.options.main_image_caption.present = false;
    state.options.list_item.present = false;
}

fn handle_progress(state: &mut DialogState, command: ProgressCommand) {
    let progress = &mut state.progress;
    match command {
        ProgressCommand::Increment(amount) => {
            progress.value = Some(progress.value.unwrap_or_default() + amount)
        }
        ProgressCommand::Indeterminate => progress.value = None,
        ProgressCommand::Complete => progress.value = Some(progress.total),
        ProgressCommand::Hide => state.options.progress_bar.present = false,
        ProgressCommand::Show => state.options.progress_bar.present = true,
        ProgressCommand::Set(Some(value)) => progress.value = Some(value),
        ProgressCommand::Set(None) => debug!("Ignoring non-numeric progress value"),
    }
}

fn button_text(state: &mut DialogState, button: Button) -> &mut CommandLineOption {
    match button {
        Button::One => &mut state.options.button1_text,
        Button::Two => &mut state.options.button2_text,
        Button::Info => &mut state.options.info_button_text,
    }
}

fn button_disabled(state: &mut DialogState, button: Button) -> &mut CommandLineOption {
    match button {
        Button::One => &mut state.options.button1_disabled,
        Button::Two => &mut state.options.button2_disabled,
        Button::Info => &mut state.options.info_button_disabled,
    }
}

fn handle_info_text(state: &mut DialogState, info: Option<String>) {
    match info {
        Some(info) => state.options.info_text.show(info),
        None => state.options.info_text.present = false,
    }
}

fn handle_info_box(state: &mut DialogState, content: TextContent) {
    if apply_text_content(&mut state.options.info_box, content) {
        state.options.info_box.present = true;
    }
}

fn handle_icon(state: &mut DialogState, command: IconCommand) {
    match command {
        IconCommand::Size(size) => state.icon_size = size.unwrap_or(DEFAULT_ICON_SIZE),
        IconCommand::Centre => state.options.centre_icon.present = true,
        IconCommand::Left => state.options.centre_icon.present = false,
        IconCommand::Hide => state.options.icon.clear(),
        IconCommand::Show(path) => state.options.icon.show(path),
    }
}

fn handle_overlay_icon(state: &mut DialogState, overlay: Option<String>) {
    match overlay {
        Some(path) => state.options.overlay_icon.show(path),
        None => state.options.overlay_icon.clear(),
    }
}

fn handle_banner_image(state: &mut DialogState, image: Option<String>) {
    match image {
        Some(path) => state.options.banner_image.show(path),
        None => {
            state.options.banner_image.clear();
            state.options.banner_title.present = false;
            state.title_font.colour = Colour::default();
        }
    }
}

fn handle_banner_text(state: &mut DialogState, command: BannerTextCommand) {
    match command {
        BannerTextCommand::Enable => {
            state.options.banner_title.present = true;
            state.title_font.colour = Colour::white();
        }
        BannerTextCommand::Disable => {
            state.options.banner_title.present = false;
            state.title_font.colour = Colour::default();
        }
        BannerTextCommand::Shadow => state.title_font.shadow = true,
        BannerTextCommand::Text(banner) => {
            state.options.banner_text.value = banner;
            state.options.banner_title.present = true;
        }
    }
}

fn handle_image(state: &mut DialogState, command: ImageCommand) {
    match command {
        ImageCommand::Show => state.options.main_image.present = true,
        ImageCommand::Hide => state.options.main_image.present = false,
        ImageCommand::Clear => state.images.clear(),
        ImageCommand::Add(path) => {
            state.images.push(MainImage::new(path));
            state.options.main_image.present = true;
        }
    }
}

fn handle_image_caption(state: &mut DialogState, caption: String) {
    match state.images.last_mut() {
        Some(image) => image.caption = Some(caption.clone()),
        None => debug!("Image caption set with no image shown"),
    }
    state.options.main_image_caption.show(caption);
}

fn handle_list(state: &mut DialogState, command: ListCommand) {
    match command {
        ListCommand::Clear => {
            state.options.list_item.present = false;
            state.list_items.clear();
            state.last_updated_row = None;
        }
        ListCommand::Show => state.options.list_item.present = true,
        ListCommand::Hide => state.options.list_item.present = false,
        ListCommand::Replace(titles) => {
            state.list_items = ListItems::from_titles(titles);
            state.last_updated_row = None;
            state.options.list_item.present = true;
        }
    }
}

fn handle_list_item(state: &mut DialogState, command: &ListItemCommand) {
    if let Some(row) = state.list_items.apply(command) {
        state.last_updated_row = Some(row);
    }
}

fn handle_video(state: &mut DialogState, command: MediaCommand) {
    match command {
        MediaCommand::Clear => state.options.video.clear(),
        MediaCommand::Load(reference) => {
            state.options.autoplay.present = true;
            let url = media::video_stream_url(&reference, state.options.autoplay.present);
            state.options.video.show(url);
        }
    }
}

fn handle_webcontent(state: &mut DialogState, command: MediaCommand) {
    match command {
        MediaCommand::Clear => state.options.webcontent.clear(),
        MediaCommand::Load(url) if media::is_web_url(&url) => state.options.webcontent.show(url),
        MediaCommand::Load(_) => {}
    }
}
