//! Offset pagination primitives shared by list endpoints.
//!
//! Requests carry a 1-indexed page number and a page size. Responses wrap a
//! slice of rows together with the total row count so clients can render
//! page controls without issuing a second query.
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(3, 10).expect("valid request");
//! assert_eq!(request.offset(), 20);
//!
//! let page = Page::new(vec!["a", "b"], 22, request);
//! assert_eq!(page.total_pages(), 3);
//! ```

mod page;
mod request;

pub use page::Page;
pub use request::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, PageRequest, PageRequestError};
