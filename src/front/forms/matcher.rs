#[derive(serde::Deserialize, Debug)]
pub struct SwipeForm {
    /// `like` or `pass`
    pub direction: String,
}
