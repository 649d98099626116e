pub mod pagination;

pub use pagination::{PageInfo, PaginationParams, DIRECTORY_PAGE_SIZE};
