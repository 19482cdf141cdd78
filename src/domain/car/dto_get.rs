#[derive(Debug, Clone, Default)]
pub struct GetCarsDto {
    /// Case-insensitive substring of the model
    pub model: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}
