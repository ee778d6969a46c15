pub mod dose;
pub mod meal;
pub mod streak;
pub mod symptom;
pub mod user;

pub use dose::DoseEvent;
pub use meal::{MealEvent, RiskLevel};
pub use streak::StreakCounter;
pub use symptom::SymptomEvent;
pub use user::User;
