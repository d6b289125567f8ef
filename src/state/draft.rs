/// The in-progress visitor draft
///
/// This struct collects everything the visitor enters across the
/// wizard steps. It exists only until submission succeeds, at which
/// point the whole wizard resets and the draft is cleared.
use crate::api::SubmitRequest;
use crate::camera::CapturedPhoto;

/// Purposes offered by the contact step's drop-down.
pub const PURPOSES: [&str; 5] = ["Meeting", "Interview", "Tour", "Delivery", "Other"];

/// Everything collected from the visitor so far.
///
/// Fields are written by the UI as the visitor types; the step gates
/// in `state::wizard` decide when the draft is good enough to move
/// forward. The draft itself never rejects input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitorDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// One of `PURPOSES`, or empty until the visitor picks one
    pub purpose: String,
    /// Who the visitor is here to see
    pub finding: String,
    pub agreed: bool,
    /// Set by the camera controller once the countdown completes
    pub photo: Option<CapturedPhoto>,
}

impl VisitorDraft {
    /// True when every required field is filled, the agreement is
    /// checked and a photo has been captured. The step gates enforce
    /// this before submission is reachable.
    pub fn is_complete(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.phone.trim().is_empty()
            && !self.purpose.is_empty()
            && !self.finding.trim().is_empty()
            && self.agreed
            && self.photo.is_some()
    }

    /// Assemble the submission payload.
    ///
    /// Text fields are sent trimmed; the photo is embedded as a
    /// base64 data URL. Returns None when no photo has been captured,
    /// since there is nothing to submit without one. No other
    /// validation happens here, the step gates already did it.
    pub fn payload(&self) -> Option<SubmitRequest> {
        let photo = self.photo.as_ref()?;
        Some(SubmitRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            purpose: self.purpose.clone(),
            finding: self.finding.trim().to_string(),
            photo: photo.to_data_url(),
            agreed: self.agreed,
        })
    }

    /// Clear every field back to the untouched state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> VisitorDraft {
        VisitorDraft {
            first_name: " Ada ".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "1234567890".into(),
            purpose: "Meeting".into(),
            finding: "Charles Babbage".into(),
            agreed: true,
            photo: Some(CapturedPhoto {
                width: 1,
                height: 1,
                png: vec![0x89, 0x50, 0x4e, 0x47],
            }),
        }
    }

    #[test]
    fn test_default_is_incomplete() {
        assert!(!VisitorDraft::default().is_complete());
    }

    #[test]
    fn test_filled_draft_is_complete() {
        assert!(filled().is_complete());

        let mut missing_agreement = filled();
        missing_agreement.agreed = false;
        assert!(!missing_agreement.is_complete());

        let mut missing_photo = filled();
        missing_photo.photo = None;
        assert!(!missing_photo.is_complete());
    }

    #[test]
    fn test_payload_requires_a_photo() {
        let mut draft = filled();
        draft.photo = None;
        assert!(draft.payload().is_none());
    }

    #[test]
    fn test_payload_trims_and_embeds_photo() {
        let payload = filled().payload().unwrap();
        assert_eq!(payload.first_name, "Ada");
        assert!(payload.photo.starts_with("data:image/png;base64,"));
        assert!(payload.agreed);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut draft = filled();
        draft.reset();
        assert_eq!(draft, VisitorDraft::default());
    }
}
