#[derive(Debug, Clone, Default)]
pub struct GetUsersDto {
    /// Case-insensitive substring of the first name
    pub first_name: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}
