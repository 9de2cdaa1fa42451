pub mod form;
pub mod list;
pub mod row;
pub mod validate;

pub use form::{SaveRequest, WordForm, WordFormValue, HINT_LIMIT};
pub use list::{PageKind, PageRequest, WordList, LOAD_MORE_LOOKAHEAD, SEARCH_DEBOUNCE};
pub use row::{DeleteRequest, RowMediator, RowSignal};
pub use validate::{FieldError, FormField};
