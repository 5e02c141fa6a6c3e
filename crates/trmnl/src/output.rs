use trmnl_core::ScreenState;
use trmnl_core::screen::fetcher::decode_data_url;

/// Show only the start of a token so it can be recognized but not copied.
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = token.chars().take(4).collect();
    if token.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

/// Describe the encoded image without dumping the payload.
pub fn describe_image(data_url: &str) -> String {
    if data_url.is_empty() {
        return "(none)".to_string();
    }
    match decode_data_url(data_url) {
        Some((content_type, bytes)) => format!("{}, {} bytes", content_type, bytes.len()),
        None => "(unreadable)".to_string(),
    }
}

pub fn print_state(state: &ScreenState) {
    let last_fetched = state
        .last_fetched_at
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());
    let image_url = if state.image_url.is_empty() {
        "(none)"
    } else {
        state.image_url.as_str()
    };

    println!("Status:        {}", state.status_text);
    println!("Token:         {}", mask_token(&state.access_token));
    println!("Image URL:     {}", image_url);
    println!("Image:         {}", describe_image(&state.image_data_url));
    println!("Last fetched:  {}", last_fetched);
    println!("Refresh every: {}s", state.refresh_rate_seconds);
}

/// One line per state change for `watch`.
pub fn state_line(state: &ScreenState) -> String {
    let marker = if state.is_loading { "…" } else { "•" };
    if state.is_loading || state.image_url.is_empty() {
        format!("{} {}", marker, state.status_text)
    } else {
        format!(
            "{} {} ({}, next in {}s)",
            marker,
            state.status_text,
            describe_image(&state.image_data_url),
            state.refresh_rate_seconds
        )
    }
}
