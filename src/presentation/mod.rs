/*!
 * Presentation Module
 * Labels and text rendering used by the command-line front end
 */

pub mod labels;
pub mod table;

pub use labels::{EnglishLabels, Language, SpanishLabels, StatusLabels};
