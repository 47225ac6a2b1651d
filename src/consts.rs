pub const CSRF_TOKEN_COOKIE_NAME: &str = "csrf_token";
pub const DRAG_STATE_COOKIE_NAME: &str = "board_drag";
pub const MATCH_DECK_COOKIE_NAME: &str = "match_deck";

pub const MAX_AGE_COOKIES: i64 = chrono::TimeDelta::hours(8).num_seconds();

pub const DEFAULT_SERVICE_TYPE: &str = "Daycare";
pub const DEFAULT_TASK_DESCRIPTION: &str = "New booking";

pub const DEFAULT_PET_PHOTO_URL: &str =
    "https://images.unsplash.com/photo-1548199973-03cce0bbc87b?auto=format&fit=crop&w=150&q=80";
pub const PLACEHOLDER_PET_PHOTO_URL: &str = "https://via.placeholder.com/150";
pub const DEFAULT_PET_BADGE: &str = "🐾 New Pet";
pub const DEFAULT_PET_STATUS: &str = "Active";
pub const DEFAULT_CUTENESS_LEVEL: u8 = 100;
pub const CHECKED_IN_LABEL: &str = "Checked In";

pub const RECENT_PETS_LIMIT: usize = 5;
pub const MAX_NATIONAL_ID_LEN: usize = 14;

/// htmx event carrying a failed mutation message to the page
pub const HX_ERROR_EVENT: &str = "petglowError";
