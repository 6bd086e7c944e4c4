#[cfg(test)]
mod tests {
    use midiline::{convert, Document, MalformedPolicy};

    const SONG: &str = r#"{
        "header": {
            "ppq": 480,
            "tempos": [
                { "ticks": 0, "bpm": 120 },
                { "ticks": 1920, "bpm": 60 }
            ]
        },
        "pitchbends": [
            { "absoluteTime": 960, "value": 0.5 },
            { "absoluteTime": 2400, "msb": 64, "lsb": 0 },
            { "absoluteTime": "soon", "value": 1.0 }
        ]
    }"#;

    #[test]
    fn test_song_document_with_skip() {
        let document = Document::from_json(SONG).unwrap();
        let conversion = convert(&document, MalformedPolicy::Skip).unwrap();

        assert_eq!(conversion.skipped, 1);
        assert_eq!(conversion.pitchbends.len(), 2);

        let first = conversion.pitchbends[0];
        assert_eq!((first.ticks, first.time, first.value), (960, 1.0, 0.5));

        // Four beats at 120 BPM, then one beat at 60 BPM
        let second = conversion.pitchbends[1];
        assert_eq!(second.ticks, 2400);
        assert!((second.time - 3.0).abs() < 1e-9);
        assert!(second.value.abs() < 0.001);
    }

    #[test]
    fn test_song_document_fails_by_default() {
        let document = Document::from_json(SONG).unwrap();
        let error = convert(&document, MalformedPolicy::default()).unwrap_err();
        assert!(error.to_string().contains("pitchbends[2]"));
    }

    #[test]
    fn test_output_shape() {
        let document = Document::from_json(
            r#"{ "pitchbends": [{ "absoluteTime": 960, "value": 0.5 }] }"#,
        )
        .unwrap();
        let conversion = convert(&document, MalformedPolicy::Fail).unwrap();

        let json = serde_json::to_string(&conversion).unwrap();
        assert_eq!(
            json,
            r#"{"ppq":480,"pitchbends":[{"ticks":960,"time":1.0,"value":0.5}]}"#
        );
    }

    #[test]
    fn test_invalid_document_json() {
        assert!(Document::from_json("{ \"header\": 12 }").is_err());
        assert!(Document::from_json("not json").is_err());
    }
}
