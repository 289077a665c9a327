pub mod card_selector;
pub mod difficulty;
pub mod interval;

pub use card_selector::{rank_cards, StudyCard};
pub use difficulty::new_difficulty;
pub use interval::{is_due, next_due_date, priority, ReviewSummary};
