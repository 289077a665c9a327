pub mod card;
pub mod progress;
pub mod session;

pub use card::{Card, Deck, Difficulty, User};
pub use progress::{ProgressUpdate, StudyProgress};
pub use session::{GradingResult, StudySession};
