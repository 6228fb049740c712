//! Per-UI-version onboarding configuration.
//!
//! Pure data. Each front-end experience carries its own tutorials and its own
//! skip policy; lookups never mutate anything.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::ids::TutorialId;
use crate::onboarding::tutorial::{RequiredAction, StepDefinition, StepPosition, TutorialDefinition};
use crate::onboarding::{SkipPolicy, UiVersion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiOnboardingConfig {
    pub ui_version: UiVersion,
    pub tutorials: Vec<TutorialDefinition>,
    /// Start the first tutorial automatically for new users.
    pub auto_start: bool,
    pub allow_skip: bool,
    /// Skips allowed before the skip option locks. Enforced by callers.
    pub max_skip_count: u32,
}

impl UiOnboardingConfig {
    pub fn skip_policy(&self) -> SkipPolicy {
        SkipPolicy {
            allow_skip: self.allow_skip,
            max_skip_count: self.max_skip_count,
        }
    }

    pub fn first_tutorial(&self) -> Option<&TutorialDefinition> {
        self.tutorials.first()
    }

    pub fn tutorial(&self, id: &str) -> Option<&TutorialDefinition> {
        self.tutorials.iter().find(|tutorial| tutorial.id == id)
    }
}

static CONFIGS: Lazy<[UiOnboardingConfig; 3]> =
    Lazy::new(|| [original_config(), v2_config(), images_mvp_config()]);

pub fn get_config(ui_version: UiVersion) -> &'static UiOnboardingConfig {
    match ui_version {
        UiVersion::Original => &CONFIGS[0],
        UiVersion::V2 => &CONFIGS[1],
        UiVersion::ImagesMvp => &CONFIGS[2],
    }
}

/// Search every UI version for a tutorial.
pub fn get_tutorial_by_id(tutorial_id: &str) -> Option<&'static TutorialDefinition> {
    CONFIGS
        .iter()
        .flat_map(|config| config.tutorials.iter())
        .find(|tutorial| tutorial.id == tutorial_id)
}

fn tutorial(
    id: &str,
    name: &str,
    description: &str,
    ui_version: UiVersion,
    steps: Vec<StepDefinition>,
) -> TutorialDefinition {
    TutorialDefinition {
        id: TutorialId::from(id),
        name: name.to_string(),
        description: description.to_string(),
        ui_version,
        steps,
    }
}

fn original_config() -> UiOnboardingConfig {
    let ui = UiVersion::Original;
    UiOnboardingConfig {
        ui_version: ui,
        auto_start: true,
        allow_skip: true,
        max_skip_count: 3,
        tutorials: vec![
            tutorial(
                "original-welcome",
                "Welcome to MetaExtract",
                "Upload a file and read the metadata hidden inside it.",
                ui,
                vec![
                    StepDefinition::new(
                        "welcome",
                        "Welcome",
                        "MetaExtract reveals the metadata embedded in your files.",
                        None,
                        StepPosition::Center,
                    )
                    .lasting(10),
                    StepDefinition::new(
                        "upload",
                        "Upload a file",
                        "Drop any image, document, audio or video file here.",
                        Some("[data-tour='upload-zone']"),
                        StepPosition::Bottom,
                    )
                    .requires(RequiredAction::Upload)
                    .mandatory()
                    .lasting(30),
                    StepDefinition::new(
                        "results",
                        "Read the results",
                        "Extracted fields are grouped by category.",
                        Some("[data-tour='metadata-results']"),
                        StepPosition::Left,
                    )
                    .lasting(20),
                    StepDefinition::new(
                        "export",
                        "Export",
                        "Download the metadata as JSON or CSV.",
                        Some("[data-tour='export-button']"),
                        StepPosition::Top,
                    )
                    .requires(RequiredAction::Click)
                    .lasting(10),
                ],
            ),
            tutorial(
                "original-advanced-fields",
                "Advanced fields",
                "Search and filter large metadata sets.",
                ui,
                vec![
                    StepDefinition::new(
                        "field-categories",
                        "Field categories",
                        "EXIF, IPTC, XMP and file-system fields live in separate tabs.",
                        Some("[data-tour='field-tabs']"),
                        StepPosition::Bottom,
                    ),
                    StepDefinition::new(
                        "search",
                        "Search fields",
                        "Type a field name to filter the result table.",
                        Some("[data-tour='field-search']"),
                        StepPosition::Bottom,
                    )
                    .requires(RequiredAction::Input),
                    StepDefinition::new(
                        "raw-view",
                        "Raw view",
                        "Switch to the raw dump for every tag the parser found.",
                        Some("[data-tour='raw-toggle']"),
                        StepPosition::Right,
                    )
                    .requires(RequiredAction::Click),
                ],
            ),
        ],
    }
}

fn v2_config() -> UiOnboardingConfig {
    let ui = UiVersion::V2;
    UiOnboardingConfig {
        ui_version: ui,
        auto_start: true,
        allow_skip: true,
        max_skip_count: 5,
        tutorials: vec![
            tutorial(
                "v2-getting-started",
                "Getting started",
                "Extract metadata from your first file in under a minute.",
                ui,
                vec![
                    StepDefinition::new(
                        "welcome",
                        "Welcome to the new MetaExtract",
                        "A quick tour of the redesigned workspace.",
                        None,
                        StepPosition::Center,
                    )
                    .lasting(8),
                    StepDefinition::new(
                        "drop-zone",
                        "Drop a file",
                        "Drag a file onto the drop zone or click to browse.",
                        Some("#upload-drop-zone"),
                        StepPosition::Bottom,
                    )
                    .requires(RequiredAction::Upload)
                    .mandatory()
                    .lasting(30),
                    StepDefinition::new(
                        "results-tabs",
                        "Explore the results",
                        "Summary, GPS, camera and raw tabs organise the extracted fields.",
                        Some("#results-tabs"),
                        StepPosition::Top,
                    )
                    .requires(RequiredAction::Click)
                    .lasting(20),
                    StepDefinition::new(
                        "credits",
                        "Credits",
                        "Each extraction uses credits; your balance is shown here.",
                        Some("#credit-balance"),
                        StepPosition::Left,
                    )
                    .lasting(10),
                ],
            ),
            tutorial(
                "v2-batch-processing",
                "Batch processing",
                "Process many files at once and download a combined report.",
                ui,
                vec![
                    StepDefinition::new(
                        "batch-upload",
                        "Select several files",
                        "Multi-select files to queue them together.",
                        Some("#batch-upload"),
                        StepPosition::Bottom,
                    )
                    .requires(RequiredAction::Upload),
                    StepDefinition::new(
                        "queue-status",
                        "Watch the queue",
                        "Each file shows its extraction status.",
                        Some("#batch-queue"),
                        StepPosition::Right,
                    ),
                    StepDefinition::new(
                        "download-report",
                        "Download the report",
                        "Get one report covering the whole batch.",
                        Some("#batch-report"),
                        StepPosition::Top,
                    )
                    .requires(RequiredAction::Click),
                ],
            ),
        ],
    }
}

fn images_mvp_config() -> UiOnboardingConfig {
    let ui = UiVersion::ImagesMvp;
    UiOnboardingConfig {
        ui_version: ui,
        auto_start: true,
        allow_skip: false,
        max_skip_count: 0,
        tutorials: vec![tutorial(
            "images-mvp-first-upload",
            "Your first photo",
            "See where and how a photo was taken.",
            ui,
            vec![
                StepDefinition::new(
                    "choose-image",
                    "Choose a photo",
                    "JPEG, HEIC, PNG and RAW files are supported.",
                    Some("[data-testid='image-upload']"),
                    StepPosition::Bottom,
                )
                .requires(RequiredAction::Upload)
                .mandatory()
                .lasting(20),
                StepDefinition::new(
                    "gps-map",
                    "Location",
                    "GPS coordinates are plotted on the map when present.",
                    Some("[data-testid='gps-map']"),
                    StepPosition::Left,
                )
                .lasting(15),
                StepDefinition::new(
                    "camera-details",
                    "Camera details",
                    "Make, model, lens and exposure settings.",
                    Some("[data-testid='camera-card']"),
                    StepPosition::Right,
                )
                .lasting(15),
                StepDefinition::new(
                    "purchase-credits",
                    "Get more credits",
                    "Buy a credit pack to keep extracting.",
                    Some("[data-testid='credits-cta']"),
                    StepPosition::Top,
                )
                .requires(RequiredAction::Navigate),
            ],
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_ui_version_has_tutorials_for_itself() {
        for version in UiVersion::ALL {
            let config = get_config(version);
            assert_eq!(config.ui_version, version);
            assert!(!config.tutorials.is_empty());
            assert!(config.tutorials.iter().all(|t| t.ui_version == version));
        }
    }

    #[test]
    fn test_tutorial_ids_are_unique_across_versions() {
        let mut seen = HashSet::new();
        for version in UiVersion::ALL {
            for tutorial in &get_config(version).tutorials {
                assert!(seen.insert(tutorial.id.clone()), "duplicate {}", tutorial.id);
            }
        }
    }

    #[test]
    fn test_step_ids_are_unique_within_tutorial() {
        for version in UiVersion::ALL {
            for tutorial in &get_config(version).tutorials {
                let ids: HashSet<_> = tutorial.steps.iter().map(|s| &s.id).collect();
                assert_eq!(ids.len(), tutorial.steps.len(), "{}", tutorial.id);
            }
        }
    }

    #[test]
    fn test_get_tutorial_by_id_searches_all_versions() {
        let tutorial = get_tutorial_by_id("images-mvp-first-upload").unwrap();
        assert_eq!(tutorial.ui_version, UiVersion::ImagesMvp);
        assert!(get_tutorial_by_id("missing").is_none());
    }

    #[test]
    fn test_images_mvp_disallows_skipping() {
        let policy = get_config(UiVersion::ImagesMvp).skip_policy();
        assert!(!policy.allow_skip);
        assert!(get_config(UiVersion::V2).skip_policy().allow_skip);
    }

    #[test]
    fn test_duration_hint_sum() {
        let tutorial = get_tutorial_by_id("v2-getting-started").unwrap();
        assert_eq!(tutorial.estimated_duration_secs(), 68);
        assert_eq!(tutorial.total_steps(), 4);
    }
}
