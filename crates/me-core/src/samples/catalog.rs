//! Built-in sample file catalog used during onboarding.

use once_cell::sync::Lazy;

use crate::ids::SampleId;
use crate::samples::model::{Difficulty, Importance, MetadataHighlight, SampleFile};

static CATALOG: Lazy<Vec<SampleFile>> = Lazy::new(build_catalog);

pub fn sample_catalog() -> &'static [SampleFile] {
    &CATALOG
}

pub fn get_sample(id: &str) -> Option<&'static SampleFile> {
    CATALOG.iter().find(|sample| sample.id == id)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn highlight(field: &str, value: &str, explanation: &str, importance: Importance) -> MetadataHighlight {
    MetadataHighlight {
        field: field.to_string(),
        value: value.to_string(),
        explanation: explanation.to_string(),
        importance,
    }
}

fn build_catalog() -> Vec<SampleFile> {
    vec![
        SampleFile {
            id: SampleId::from("smartphone-photo"),
            name: "Smartphone vacation photo".to_string(),
            description: "A JPEG straight from a phone camera, GPS tags included.".to_string(),
            file_type: "jpg".to_string(),
            difficulty: Difficulty::Basic,
            use_cases: strings(&["personal", "privacy"]),
            tags: strings(&["photo", "gps", "smartphone", "travel"]),
            highlights: vec![
                highlight(
                    "GPSLatitude",
                    "48.8584 N",
                    "The exact spot the photo was taken.",
                    Importance::Critical,
                ),
                highlight(
                    "Model",
                    "iPhone 14 Pro",
                    "The device that captured the image.",
                    Importance::High,
                ),
            ],
            learning_points: strings(&[
                "find where a photo was taken",
                "identify the capture device",
            ]),
            common_uses: strings(&["privacy check before sharing", "organize travel photos"]),
        },
        SampleFile {
            id: SampleId::from("office-document"),
            name: "Quarterly report".to_string(),
            description: "A word-processor document with author and revision history.".to_string(),
            file_type: "docx".to_string(),
            difficulty: Difficulty::Basic,
            use_cases: strings(&["business"]),
            tags: strings(&["document", "author", "office", "revision"]),
            highlights: vec![highlight(
                "Author",
                "j.doe",
                "Who created the document.",
                Importance::High,
            )],
            learning_points: strings(&["see who authored a document", "track revisions"]),
            common_uses: strings(&["remove personal data before publishing"]),
        },
        SampleFile {
            id: SampleId::from("podcast-episode"),
            name: "Podcast episode".to_string(),
            description: "An MP3 with ID3 tags and embedded cover art.".to_string(),
            file_type: "mp3".to_string(),
            difficulty: Difficulty::Basic,
            use_cases: strings(&["personal", "media"]),
            tags: strings(&["audio", "id3", "music", "media"]),
            highlights: vec![highlight(
                "Artist",
                "The Metadata Show",
                "ID3 tags identify the publisher.",
                Importance::Medium,
            )],
            learning_points: strings(&["read audio tags", "find embedded artwork"]),
            common_uses: strings(&["organize music libraries"]),
        },
        SampleFile {
            id: SampleId::from("signed-contract"),
            name: "Signed contract".to_string(),
            description: "A PDF with producer, creation dates and a digital signature.".to_string(),
            file_type: "pdf".to_string(),
            difficulty: Difficulty::Intermediate,
            use_cases: strings(&["business", "legal"]),
            tags: strings(&["document", "pdf", "legal", "signature"]),
            highlights: vec![
                highlight(
                    "CreateDate",
                    "2024-03-02T10:14:00Z",
                    "When the PDF was generated.",
                    Importance::High,
                ),
                highlight(
                    "Producer",
                    "Acrobat PDFMaker 23",
                    "Software that produced the file.",
                    Importance::Medium,
                ),
            ],
            learning_points: strings(&["verify document timelines", "spot the producing software"]),
            common_uses: strings(&["contract due diligence", "legal discovery"]),
        },
        SampleFile {
            id: SampleId::from("edited-news-image"),
            name: "Edited news image".to_string(),
            description: "A PNG re-saved by an editor, with software history.".to_string(),
            file_type: "png".to_string(),
            difficulty: Difficulty::Intermediate,
            use_cases: strings(&["forensics", "journalism"]),
            tags: strings(&["photo", "editing", "forensics", "media"]),
            highlights: vec![highlight(
                "Software",
                "Adobe Photoshop 25.0",
                "The image was modified after capture.",
                Importance::Critical,
            )],
            learning_points: strings(&["detect image manipulation", "compare capture and edit dates"]),
            common_uses: strings(&["fact-checking images", "verify authenticity"]),
        },
        SampleFile {
            id: SampleId::from("dslr-raw"),
            name: "DSLR raw capture".to_string(),
            description: "A CR2 raw file with full maker notes.".to_string(),
            file_type: "cr2".to_string(),
            difficulty: Difficulty::Advanced,
            use_cases: strings(&["photography", "forensics"]),
            tags: strings(&["photo", "raw", "exif", "camera"]),
            highlights: vec![
                highlight(
                    "SerialNumber",
                    "0832001457",
                    "Ties the photo to one physical camera body.",
                    Importance::Critical,
                ),
                highlight(
                    "LensModel",
                    "EF24-70mm f/2.8L II USM",
                    "Lens used for the shot.",
                    Importance::Medium,
                ),
            ],
            learning_points: strings(&["read maker notes", "link photos to a camera body"]),
            common_uses: strings(&["copyright claims", "verify authenticity"]),
        },
        SampleFile {
            id: SampleId::from("drone-footage"),
            name: "Drone footage".to_string(),
            description: "An MP4 with flight telemetry in its metadata track.".to_string(),
            file_type: "mp4".to_string(),
            difficulty: Difficulty::Advanced,
            use_cases: strings(&["forensics", "research"]),
            tags: strings(&["video", "gps", "telemetry", "drone"]),
            highlights: vec![highlight(
                "FlightPath",
                "212 GPS samples",
                "Per-frame location of the drone.",
                Importance::High,
            )],
            learning_points: strings(&["extract video telemetry", "reconstruct a flight path"]),
            common_uses: strings(&["incident investigation", "survey verification"]),
        },
        SampleFile {
            id: SampleId::from("medical-scan"),
            name: "Medical scan".to_string(),
            description: "A DICOM image with patient and equipment attributes.".to_string(),
            file_type: "dcm".to_string(),
            difficulty: Difficulty::Advanced,
            use_cases: strings(&["research", "healthcare"]),
            tags: strings(&["dicom", "medical", "healthcare", "imaging"]),
            highlights: vec![highlight(
                "PatientID",
                "ANON-4411",
                "Identifiers that must be scrubbed before sharing.",
                Importance::Critical,
            )],
            learning_points: strings(&["audit DICOM attributes", "check anonymization"]),
            common_uses: strings(&["research data sharing"]),
        },
    ]
}
