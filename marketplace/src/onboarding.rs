//! Four-step artist profile creation.
//!
//! ```text
//! Identity(1) -> Categories(2) -> Details(3) -> Image(4) -> Submitted
//! ```
//!
//! Moving forward requires the current step to validate; moving back is
//! unconditional and stops at step 1. `Submitted` is terminal until `Reset`.
//! Each step's fields live in their own struct with a pure validation
//! function, so a draft can be checked step by step or all at once.
//!
//! Image uploads are read asynchronously: selecting an image puts the slot in
//! `Uploading` and returns an effect that encodes the bytes as a `data:` URL.
//! Each upload carries a sequence number; a result that no longer matches the
//! slot (the image was replaced, removed, reset or the form submitted) is
//! dropped.

use crate::domain::{ArtistId, Category, NewArtist, PriceRange, Rating};
use crate::environment::MarketplaceEnvironment;
use artistly_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Minimum trimmed length of the display name
pub const MIN_NAME_CHARS: usize = 2;
/// Minimum trimmed length of the biography
pub const MIN_BIO_CHARS: usize = 50;

/// Position in the form
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    /// Step 1: name and bio
    #[default]
    Identity,
    /// Step 2: categories
    Categories,
    /// Step 3: languages, price range and location
    Details,
    /// Step 4: optional image
    Image,
    /// Profile created
    Submitted,
}

impl FormStep {
    /// Number of input steps
    pub const COUNT: u8 = 4;

    /// 1-based step number; `Submitted` reports the last step
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Identity => 1,
            Self::Categories => 2,
            Self::Details => 3,
            Self::Image | Self::Submitted => 4,
        }
    }

    /// Completion percentage shown in the progress bar
    #[must_use]
    pub const fn progress_percent(self) -> u8 {
        self.number() * (100 / Self::COUNT)
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::Identity => Some(Self::Categories),
            Self::Categories => Some(Self::Details),
            Self::Details => Some(Self::Image),
            Self::Image | Self::Submitted => None,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Identity | Self::Categories => Self::Identity,
            Self::Details => Self::Categories,
            Self::Image => Self::Details,
            Self::Submitted => Self::Submitted,
        }
    }
}

/// A validation message attached to a form field
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as the form knows it (`"priceRange"`)
    pub field: String,
    /// Message shown next to the field
    pub message: String,
}

impl FieldError {
    /// Error attached to `field`
    #[must_use]
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Step 1 fields
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IdentityStep {
    /// Display name
    pub name: String,
    /// Biography
    pub bio: String,
}

/// Step 2 fields
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStep {
    /// Selected categories
    pub categories: Vec<Category>,
}

/// Step 3 fields
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DetailsStep {
    /// Spoken languages
    pub languages: Vec<String>,
    /// Fee bucket
    pub price_range: Option<PriceRange>,
    /// City and state
    pub location: String,
}

/// Upload state of the profile image
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageSlot {
    /// No image chosen
    #[default]
    Empty,
    /// Bytes are being encoded
    Uploading {
        /// Sequence number of the upload
        upload: u64,
    },
    /// Encoded and ready
    Ready {
        /// `data:` URL of the image
        data_url: String,
    },
}

/// Step 4 fields
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImageStep {
    /// Image slot
    pub image: ImageSlot,
}

/// Draft profile, one section per step
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileDraft {
    /// Step 1
    pub identity: IdentityStep,
    /// Step 2
    pub categories: CategoryStep,
    /// Step 3
    pub details: DetailsStep,
    /// Step 4
    pub image: ImageStep,
}

fn collect(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates step 1
///
/// # Errors
///
/// Returns field errors for a short name or bio (both measured trimmed).
pub fn validate_identity(step: &IdentityStep) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if step.name.trim().chars().count() < MIN_NAME_CHARS {
        errors.push(FieldError::new("name", "Name must be at least 2 characters"));
    }
    if step.bio.trim().chars().count() < MIN_BIO_CHARS {
        errors.push(FieldError::new("bio", "Bio must be at least 50 characters"));
    }
    collect(errors)
}

/// Validates step 2
///
/// # Errors
///
/// Returns a field error when no category is selected.
pub fn validate_categories(step: &CategoryStep) -> Result<(), Vec<FieldError>> {
    if step.categories.is_empty() {
        return Err(vec![FieldError::new("category", "Select at least one category")]);
    }
    Ok(())
}

/// Validates step 3
///
/// # Errors
///
/// Returns field errors for missing languages, price range or location.
pub fn validate_details(step: &DetailsStep) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if step.languages.is_empty() {
        errors.push(FieldError::new("languages", "Select at least one language"));
    }
    if step.price_range.is_none() {
        errors.push(FieldError::new("priceRange", "Select a price range"));
    }
    if step.location.trim().is_empty() {
        errors.push(FieldError::new("location", "Location is required"));
    }
    collect(errors)
}

/// Validates step 4. The image is optional, but an upload must have finished.
///
/// # Errors
///
/// Returns a field error while the image is still uploading.
pub fn validate_image(step: &ImageStep) -> Result<(), Vec<FieldError>> {
    if matches!(step.image, ImageSlot::Uploading { .. }) {
        return Err(vec![FieldError::new(
            "image",
            "Please wait for the image upload to finish",
        )]);
    }
    Ok(())
}

impl ProfileDraft {
    /// Validates the fields of one step
    ///
    /// # Errors
    ///
    /// Returns that step's field errors.
    pub fn validate_step(&self, step: FormStep) -> Result<(), Vec<FieldError>> {
        match step {
            FormStep::Identity => validate_identity(&self.identity),
            FormStep::Categories => validate_categories(&self.categories),
            FormStep::Details => validate_details(&self.details),
            FormStep::Image => validate_image(&self.image),
            FormStep::Submitted => Ok(()),
        }
    }

    /// Validates every step and builds the artist record.
    ///
    /// New artists start with a perfect rating, no reviews, unverified and
    /// available; without an uploaded image `default_image` is used.
    ///
    /// # Errors
    ///
    /// Returns the field errors of every failing step.
    pub fn build(&self, default_image: &str) -> Result<NewArtist, Vec<FieldError>> {
        let errors: Vec<FieldError> = [
            validate_identity(&self.identity),
            validate_categories(&self.categories),
            validate_details(&self.details),
            validate_image(&self.image),
        ]
        .into_iter()
        .filter_map(Result::err)
        .flatten()
        .collect();
        collect(errors)?;

        let Some(price_range) = self.details.price_range else {
            return Err(vec![FieldError::new("priceRange", "Select a price range")]);
        };

        let image = match &self.image.image {
            ImageSlot::Ready { data_url } => data_url.clone(),
            ImageSlot::Empty | ImageSlot::Uploading { .. } => default_image.to_string(),
        };

        Ok(NewArtist {
            name: self.identity.name.trim().to_string(),
            category: self.categories.categories.clone(),
            bio: self.identity.bio.trim().to_string(),
            price_range,
            location: self.details.location.trim().to_string(),
            languages: self.details.languages.clone(),
            image,
            rating: Rating::MAX,
            review_count: 0,
            verified: false,
            availability: "Available".to_string(),
        })
    }
}

/// Edits to one step's fields. Absent fields are left unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepInput {
    /// Step 1 edits
    Identity {
        /// New name
        #[serde(default)]
        name: Option<String>,
        /// New bio
        #[serde(default)]
        bio: Option<String>,
    },
    /// Step 2 edits
    Categories {
        /// New category selection
        categories: Vec<Category>,
    },
    /// Step 3 edits
    Details {
        /// New language selection
        #[serde(default)]
        languages: Option<Vec<String>>,
        /// New price range
        #[serde(default)]
        price_range: Option<PriceRange>,
        /// New location
        #[serde(default)]
        location: Option<String>,
    },
}

impl StepInput {
    fn apply(self, draft: &mut ProfileDraft) -> Vec<&'static str> {
        let mut touched = Vec::new();
        match self {
            Self::Identity { name, bio } => {
                if let Some(name) = name {
                    draft.identity.name = name;
                    touched.push("name");
                }
                if let Some(bio) = bio {
                    draft.identity.bio = bio;
                    touched.push("bio");
                }
            },
            Self::Categories { categories } => {
                draft.categories.categories = categories;
                touched.push("category");
            },
            Self::Details {
                languages,
                price_range,
                location,
            } => {
                if let Some(languages) = languages {
                    draft.details.languages = languages;
                    touched.push("languages");
                }
                if let Some(price_range) = price_range {
                    draft.details.price_range = Some(price_range);
                    touched.push("priceRange");
                }
                if let Some(location) = location {
                    draft.details.location = location;
                    touched.push("location");
                }
            },
        }
        touched
    }
}

/// Why a selected image was refused
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageRejection {
    /// Larger than the configured ceiling
    TooLarge {
        /// Size of the selected file
        size: usize,
        /// Ceiling in bytes
        limit: usize,
    },
    /// Not an `image/*` content type
    UnsupportedType {
        /// Content type as received
        content_type: String,
    },
}

impl fmt::Display for ImageRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { limit, .. } => {
                write!(f, "Image must be under {}", human_size(*limit))
            },
            Self::UnsupportedType { .. } => f.write_str("Only image files are supported"),
        }
    }
}

/// `5 MB`, `1.5 MB`, `512 KB` or `16 bytes`, with one decimal at most
fn human_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    let (unit, name) = match bytes {
        b if b >= MB => (MB, "MB"),
        b if b >= KB => (KB, "KB"),
        b => return format!("{b} bytes"),
    };

    let tenths = bytes * 10 / unit;
    if tenths % 10 == 0 {
        format!("{} {name}", tenths / 10)
    } else {
        format!("{}.{} {name}", tenths / 10, tenths % 10)
    }
}

/// State of the onboarding form
#[derive(Clone, Debug, Default, Serialize)]
pub struct OnboardingState {
    /// Current step
    pub step: FormStep,
    /// Entered data
    pub draft: ProfileDraft,
    /// Field errors from the last failed validation
    pub errors: Vec<FieldError>,
    /// Rejection of the last selected image, if it was refused
    pub image_rejection: Option<ImageRejection>,
    /// Record handed to the catalog on submission
    pub submitted: Option<NewArtist>,
    /// Id the catalog assigned to the submitted profile
    pub created_artist: Option<ArtistId>,
    #[serde(skip)]
    upload_seq: u64,
}

impl OnboardingState {
    /// Completion percentage of the current step
    #[must_use]
    pub const fn progress_percent(&self) -> u8 {
        self.step.progress_percent()
    }

    /// Whether an image is being encoded
    #[must_use]
    pub const fn is_uploading(&self) -> bool {
        matches!(self.draft.image.image, ImageSlot::Uploading { .. })
    }
}

/// Commands and events for onboarding
#[derive(Clone, Debug, PartialEq)]
pub enum OnboardingAction {
    // ========== Commands ==========
    /// Command: Edit draft fields
    UpdateStep {
        /// Edits
        input: StepInput,
    },
    /// Command: Select or deselect a category
    ToggleCategory {
        /// Category to flip
        category: Category,
    },
    /// Command: Select or deselect a language
    ToggleLanguage {
        /// Language to flip
        language: String,
    },
    /// Command: Validate the current step and advance
    NextStep,
    /// Command: Go back one step
    PreviousStep,
    /// Command: Validate everything and create the profile
    Submit,
    /// Command: Start over with an empty draft
    Reset,
    /// Command: Upload a profile image
    SelectImage {
        /// Declared content type
        content_type: String,
        /// Raw file contents
        bytes: Arc<[u8]>,
    },
    /// Command: Clear the profile image
    RemoveImage,

    // ========== Events ==========
    /// Event: An upload finished encoding
    ImageLoaded {
        /// Sequence number the upload was started with
        upload: u64,
        /// Encoded image
        data_url: String,
    },
    /// Event: A selected image was refused
    ImageRejected {
        /// Why
        rejection: ImageRejection,
    },
    /// Event: The form passed validation and produced an artist record
    ProfileSubmitted {
        /// Record for the catalog
        artist: NewArtist,
    },
    /// Event: Validation failed
    ValidationFailed {
        /// Field errors
        errors: Vec<FieldError>,
    },
    /// Event: The catalog refused a submitted profile; the form reopens at
    /// the image step
    ProfileRejected {
        /// Why, as field errors
        errors: Vec<FieldError>,
    },
}

/// Encodes bytes as a `data:<type>;base64,...` URL
#[must_use]
pub fn encode_data_url(content_type: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{content_type};base64,{encoded}")
}

/// Reducer for the onboarding form
#[derive(Clone, Debug, Default)]
pub struct OnboardingReducer;

impl OnboardingReducer {
    /// Creates a new `OnboardingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Checks a selected image against the size ceiling and content type
    fn validate_image_file(
        content_type: &str,
        size: usize,
        limit: usize,
    ) -> Result<String, ImageRejection> {
        if size > limit {
            return Err(ImageRejection::TooLarge { size, limit });
        }

        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !mime.starts_with("image/") {
            return Err(ImageRejection::UnsupportedType {
                content_type: content_type.to_string(),
            });
        }

        Ok(mime)
    }

    /// Applies an event to state
    fn apply_event(state: &mut OnboardingState, action: &OnboardingAction) {
        match action {
            OnboardingAction::ImageLoaded { upload, data_url } => {
                if state.step != FormStep::Submitted
                    && state.draft.image.image == (ImageSlot::Uploading { upload: *upload })
                {
                    state.draft.image.image = ImageSlot::Ready {
                        data_url: data_url.clone(),
                    };
                } else {
                    tracing::debug!(upload, "Dropping stale image upload");
                }
            },
            OnboardingAction::ImageRejected { rejection } => {
                state.image_rejection = Some(rejection.clone());
            },
            OnboardingAction::ProfileSubmitted { artist } => {
                state.step = FormStep::Submitted;
                state.submitted = Some(artist.clone());
                state.errors.clear();
            },
            OnboardingAction::ValidationFailed { errors } => {
                metrics::counter!("marketplace.validation.failed", "feature" => "onboarding")
                    .increment(1);
                state.errors.clone_from(errors);
            },
            OnboardingAction::ProfileRejected { errors } => {
                state.step = FormStep::Image;
                state.submitted = None;
                state.created_artist = None;
                state.errors.clone_from(errors);
            },
            // Commands are not applied to state
            OnboardingAction::UpdateStep { .. }
            | OnboardingAction::ToggleCategory { .. }
            | OnboardingAction::ToggleLanguage { .. }
            | OnboardingAction::NextStep
            | OnboardingAction::PreviousStep
            | OnboardingAction::Submit
            | OnboardingAction::Reset
            | OnboardingAction::SelectImage { .. }
            | OnboardingAction::RemoveImage => {},
        }
    }

    fn clear_errors_for(state: &mut OnboardingState, fields: &[&str]) {
        state
            .errors
            .retain(|error| !fields.contains(&error.field.as_str()));
    }
}

fn toggle<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if let Some(index) = values.iter().position(|v| *v == value) {
        values.remove(index);
    } else {
        values.push(value);
    }
}

impl Reducer for OnboardingReducer {
    type State = OnboardingState;
    type Action = OnboardingAction;
    type Environment = MarketplaceEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let submitted = state.step == FormStep::Submitted;

        match action {
            // ========== Commands ==========
            OnboardingAction::UpdateStep { input } if !submitted => {
                let touched = input.apply(&mut state.draft);
                Self::clear_errors_for(state, &touched);
            },
            OnboardingAction::ToggleCategory { category } if !submitted => {
                toggle(&mut state.draft.categories.categories, category);
                Self::clear_errors_for(state, &["category"]);
            },
            OnboardingAction::ToggleLanguage { language } if !submitted => {
                toggle(&mut state.draft.details.languages, language);
                Self::clear_errors_for(state, &["languages"]);
            },
            OnboardingAction::NextStep => {
                let Some(next) = state.step.next() else {
                    return SmallVec::new();
                };

                if let Err(errors) = state.draft.validate_step(state.step) {
                    tracing::debug!(step = ?state.step, errors = errors.len(), "Step validation failed");
                    Self::apply_event(state, &OnboardingAction::ValidationFailed { errors });
                    return SmallVec::new();
                }

                state.step = next;
                state.errors.clear();
            },
            OnboardingAction::PreviousStep if !submitted => {
                state.step = state.step.previous();
                state.errors.clear();
            },
            OnboardingAction::Submit => {
                if state.step != FormStep::Image {
                    tracing::warn!(step = ?state.step, "Submit outside the image step ignored");
                    return SmallVec::new();
                }

                let event = match state.draft.build(&env.settings.default_artist_image) {
                    Ok(artist) => {
                        tracing::info!(name = %artist.name, "Artist profile submitted");
                        OnboardingAction::ProfileSubmitted { artist }
                    },
                    Err(errors) => OnboardingAction::ValidationFailed { errors },
                };
                Self::apply_event(state, &event);
            },
            OnboardingAction::Reset => {
                *state = OnboardingState {
                    upload_seq: state.upload_seq,
                    ..OnboardingState::default()
                };
            },
            OnboardingAction::SelectImage {
                content_type,
                bytes,
            } if !submitted => {
                let content_type = match Self::validate_image_file(
                    &content_type,
                    bytes.len(),
                    env.settings.max_image_bytes,
                ) {
                    Ok(mime) => mime,
                    Err(rejection) => {
                        tracing::warn!(%rejection, size = bytes.len(), "Image rejected");
                        Self::apply_event(state, &OnboardingAction::ImageRejected { rejection });
                        return SmallVec::new();
                    },
                };

                state.upload_seq += 1;
                let upload = state.upload_seq;
                state.draft.image.image = ImageSlot::Uploading { upload };
                state.image_rejection = None;
                Self::clear_errors_for(state, &["image"]);

                return smallvec![async_effect! {
                    let data_url = encode_data_url(&content_type, &bytes);
                    Some(OnboardingAction::ImageLoaded { upload, data_url })
                }];
            },
            OnboardingAction::RemoveImage if !submitted => {
                state.draft.image.image = ImageSlot::Empty;
                state.image_rejection = None;
                Self::clear_errors_for(state, &["image"]);
            },

            // ========== Events ==========
            OnboardingAction::ImageLoaded { .. }
            | OnboardingAction::ImageRejected { .. }
            | OnboardingAction::ProfileSubmitted { .. }
            | OnboardingAction::ValidationFailed { .. }
            | OnboardingAction::ProfileRejected { .. } => {
                Self::apply_event(state, &action);
            },

            // Edits after submission
            OnboardingAction::UpdateStep { .. }
            | OnboardingAction::ToggleCategory { .. }
            | OnboardingAction::ToggleLanguage { .. }
            | OnboardingAction::PreviousStep
            | OnboardingAction::SelectImage { .. }
            | OnboardingAction::RemoveImage => {
                tracing::debug!("Profile already submitted, edit ignored");
            },
        }

        SmallVec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::environment::MarketplaceSettings;
    use crate::seed::DEFAULT_ARTIST_IMAGE;
    use artistly_testing::{assertions, test_clock, ReducerTest, SequentialIdGenerator};

    const LONG_BIO: &str = "Award-winning flamenco guitarist touring festivals across Europe";

    fn test_env() -> MarketplaceEnvironment {
        MarketplaceEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new("artist")),
            MarketplaceSettings::default(),
        )
    }

    fn identity(name: &str, bio: &str) -> OnboardingAction {
        OnboardingAction::UpdateStep {
            input: StepInput::Identity {
                name: Some(name.to_string()),
                bio: Some(bio.to_string()),
            },
        }
    }

    /// Actions that fill every step and end on the image step
    fn complete_form() -> Vec<OnboardingAction> {
        vec![
            identity("  Lucia Vega ", LONG_BIO),
            OnboardingAction::NextStep,
            OnboardingAction::ToggleCategory {
                category: Category::Bands,
            },
            OnboardingAction::NextStep,
            OnboardingAction::UpdateStep {
                input: StepInput::Details {
                    languages: Some(vec!["Spanish".to_string()]),
                    price_range: Some(PriceRange::From2500To5000),
                    location: Some("Austin, TX".to_string()),
                },
            },
            OnboardingAction::NextStep,
        ]
    }

    fn field_names(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn short_bio_blocks_step_one() {
        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_actions([identity("Lucia", "Too short"), OnboardingAction::NextStep])
            .then_state(|state| {
                assert_eq!(state.step, FormStep::Identity);
                assert_eq!(
                    state.errors,
                    vec![FieldError::new("bio", "Bio must be at least 50 characters")]
                );
            })
            .run();
    }

    #[test]
    fn long_bio_passes_step_one() {
        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_actions([identity("Lucia", LONG_BIO), OnboardingAction::NextStep])
            .then_state(|state| {
                assert_eq!(state.step, FormStep::Categories);
                assert_eq!(state.progress_percent(), 50);
                assert!(state.errors.is_empty());
            })
            .run();
    }

    #[test]
    fn lengths_are_measured_trimmed() {
        let padded = IdentityStep {
            name: " A ".to_string(),
            bio: format!("   {}   ", "x".repeat(49)),
        };
        let errors = validate_identity(&padded).unwrap_err();
        assert_eq!(field_names(&errors), vec!["name", "bio"]);
    }

    #[test]
    fn details_report_every_missing_field() {
        let errors = validate_details(&DetailsStep::default()).unwrap_err();
        assert_eq!(field_names(&errors), vec!["languages", "priceRange", "location"]);
        assert_eq!(errors[1].message, "Select a price range");
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_actions([
                identity("L", "short"),
                OnboardingAction::NextStep,
                OnboardingAction::UpdateStep {
                    input: StepInput::Identity {
                        name: Some("Lucia".to_string()),
                        bio: None,
                    },
                },
            ])
            .then_state(|state| assert_eq!(field_names(&state.errors), vec!["bio"]))
            .run();
    }

    #[test]
    fn back_is_unconditional_and_clamped() {
        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_actions([
                identity("Lucia", LONG_BIO),
                OnboardingAction::NextStep,
                OnboardingAction::PreviousStep,
                OnboardingAction::PreviousStep,
            ])
            .then_state(|state| assert_eq!(state.step, FormStep::Identity))
            .run();
    }

    #[test]
    fn submit_builds_artist_with_defaults() {
        let mut actions = complete_form();
        actions.push(OnboardingAction::Submit);

        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_actions(actions)
            .then_state(|state| {
                assert_eq!(state.step, FormStep::Submitted);
                let artist = state.submitted.as_ref().unwrap();
                assert_eq!(artist.name, "Lucia Vega");
                assert_eq!(artist.category, vec![Category::Bands]);
                assert_eq!(artist.rating, Rating::MAX);
                assert_eq!(artist.review_count, 0);
                assert!(!artist.verified);
                assert_eq!(artist.availability, "Available");
                assert_eq!(artist.image, DEFAULT_ARTIST_IMAGE);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn submit_only_from_image_step() {
        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_actions([identity("Lucia", LONG_BIO), OnboardingAction::Submit])
            .then_state(|state| {
                assert_eq!(state.step, FormStep::Identity);
                assert!(state.submitted.is_none());
            })
            .run();
    }

    #[test]
    fn submitted_is_terminal_until_reset() {
        let mut actions = complete_form();
        actions.extend([
            OnboardingAction::Submit,
            OnboardingAction::PreviousStep,
            identity("Someone Else", LONG_BIO),
        ]);

        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_actions(actions)
            .then_state(|state| {
                assert_eq!(state.step, FormStep::Submitted);
                assert_eq!(state.draft.identity.name, "  Lucia Vega ");
            })
            .run();
    }

    #[test]
    fn oversized_image_is_rejected_without_touching_draft() {
        let bytes: Arc<[u8]> = vec![0_u8; 2 * 1024 * 1024 + 1].into();

        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_action(OnboardingAction::SelectImage {
                content_type: "image/png".to_string(),
                bytes,
            })
            .then_state(|state| {
                assert_eq!(state.draft.image.image, ImageSlot::Empty);
                let rejection = state.image_rejection.as_ref().unwrap();
                assert_eq!(rejection.to_string(), "Image must be under 2 MB");
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn small_limits_are_not_rounded_to_zero() {
        let too_large = |limit| ImageRejection::TooLarge { size: limit + 1, limit }.to_string();

        assert_eq!(too_large(16), "Image must be under 16 bytes");
        assert_eq!(too_large(512 * 1024), "Image must be under 512 KB");
        assert_eq!(too_large(1536), "Image must be under 1.5 KB");
        assert_eq!(too_large(3 * 1024 * 1024 / 2), "Image must be under 1.5 MB");
        assert_eq!(too_large(5 * 1024 * 1024), "Image must be under 5 MB");
    }

    #[test]
    fn non_image_is_rejected() {
        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_action(OnboardingAction::SelectImage {
                content_type: "application/pdf".to_string(),
                bytes: Arc::from(&b"%PDF"[..]),
            })
            .then_state(|state| {
                assert_eq!(
                    state.image_rejection.as_ref().map(ToString::to_string).as_deref(),
                    Some("Only image files are supported")
                );
            })
            .run();
    }

    #[tokio::test]
    async fn upload_encodes_data_url() {
        let reducer = OnboardingReducer::new();
        let env = test_env();
        let mut state = OnboardingState::default();

        let mut effects = reducer.reduce(
            &mut state,
            OnboardingAction::SelectImage {
                content_type: "image/PNG; charset=binary".to_string(),
                bytes: Arc::from(&b"png"[..]),
            },
            &env,
        );
        assert!(state.is_uploading());
        assertions::assert_has_future_effect(&effects);

        let Some(Effect::Future(future)) = effects.pop() else {
            panic!("expected a future effect");
        };
        let loaded = future.await.unwrap();
        assert_eq!(
            loaded,
            OnboardingAction::ImageLoaded {
                upload: 1,
                data_url: "data:image/png;base64,cG5n".to_string(),
            }
        );

        reducer.reduce(&mut state, loaded, &env);
        assert_eq!(
            state.draft.image.image,
            ImageSlot::Ready {
                data_url: "data:image/png;base64,cG5n".to_string()
            }
        );
    }

    #[test]
    fn stale_upload_after_reset_is_dropped() {
        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_actions([
                OnboardingAction::SelectImage {
                    content_type: "image/jpeg".to_string(),
                    bytes: Arc::from(&b"jpg"[..]),
                },
                OnboardingAction::Reset,
                OnboardingAction::SelectImage {
                    content_type: "image/jpeg".to_string(),
                    bytes: Arc::from(&b"new"[..]),
                },
                // Result of the first upload arrives late
                OnboardingAction::ImageLoaded {
                    upload: 1,
                    data_url: "data:image/jpeg;base64,anBn".to_string(),
                },
            ])
            .then_state(|state| {
                assert_eq!(state.draft.image.image, ImageSlot::Uploading { upload: 2 });
            })
            .run();
    }

    #[test]
    fn submit_waits_for_upload() {
        let mut actions = complete_form();
        actions.extend([
            OnboardingAction::SelectImage {
                content_type: "image/webp".to_string(),
                bytes: Arc::from(&b"webp"[..]),
            },
            OnboardingAction::Submit,
        ]);

        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_actions(actions)
            .then_state(|state| {
                assert_eq!(state.step, FormStep::Image);
                assert_eq!(field_names(&state.errors), vec!["image"]);
            })
            .run();
    }

    #[test]
    fn uploaded_image_is_used_on_submit() {
        let mut actions = complete_form();
        actions.extend([
            OnboardingAction::SelectImage {
                content_type: "image/gif".to_string(),
                bytes: Arc::from(&b"gif"[..]),
            },
            OnboardingAction::ImageLoaded {
                upload: 1,
                data_url: "data:image/gif;base64,Z2lm".to_string(),
            },
            OnboardingAction::Submit,
        ]);

        ReducerTest::new(OnboardingReducer::new())
            .with_env(test_env())
            .given_state(OnboardingState::default())
            .when_actions(actions)
            .then_state(|state| {
                let artist = state.submitted.as_ref().unwrap();
                assert_eq!(artist.image, "data:image/gif;base64,Z2lm");
            })
            .run();
    }

    #[test]
    fn step_input_wire_format() {
        let input: StepInput =
            serde_json::from_str(r#"{"step":"details","price_range":"10000+"}"#).unwrap();
        assert_eq!(
            input,
            StepInput::Details {
                languages: None,
                price_range: Some(PriceRange::Above10000),
                location: None,
            }
        );
    }
}
