use teloxide::types::{KeyboardButton, KeyboardMarkup as ReplyKeyboardMarkup};

/// Persistent menu keyboard, one label per row.
pub fn menu_keyboard(labels: &[String]) -> ReplyKeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = labels
        .iter()
        .map(|label| vec![KeyboardButton::new(label.clone())])
        .collect();
    ReplyKeyboardMarkup::new(rows).resize_keyboard(true)
}
