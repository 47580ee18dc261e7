mod audio_controls;
mod conversation_view;
mod location_form;
mod notifications;
mod question_bar;

pub use audio_controls::AudioControls;
pub use conversation_view::ConversationView;
pub use location_form::LocationForm;
pub use notifications::NotificationStack;
pub use question_bar::QuestionBar;
