//! Decoding of the OCR service's text-detection response.
//!
//! The service annotates an image and answers with one response per image.
//! Its first text annotation holds the whole recognized text; the rest are
//! individual words with their bounding polygons.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OcrError;

/// Body of an `images:annotate` reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotateResponse {
    pub responses: Vec<ImageAnnotation>,
}

/// Annotations for one image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageAnnotation {
    pub text_annotations: Vec<TextAnnotation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiStatus>,
}

/// A recognized piece of text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextAnnotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_poly: Option<BoundingPoly>,
}

/// Polygon around a text annotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingPoly {
    pub vertices: Vec<Vertex>,
}

/// Polygon corner. The service omits zero coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

/// Error status attached to a failed image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiStatus {
    pub code: i32,
    pub message: String,
}

impl AnnotateResponse {
    /// Decode a response body.
    pub fn from_json(body: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// The whole-page text of the first image.
    pub fn full_text(&self) -> Result<&str, OcrError> {
        let first = self.responses.first().ok_or(OcrError::NoText)?;

        if let Some(status) = &first.error {
            return Err(OcrError::Api(format!("{} (code {})", status.message, status.code)));
        }

        let text = first
            .text_annotations
            .first()
            .map(|a| a.description.as_str())
            .ok_or(OcrError::NoText)?;

        debug!(
            "OCR response carries {} annotations, {} characters of text",
            first.text_annotations.len(),
            text.len()
        );

        Ok(text)
    }

    /// Word-level annotations of the first image.
    pub fn annotations(&self) -> &[TextAnnotation] {
        self.responses
            .first()
            .and_then(|r| r.text_annotations.get(1..))
            .unwrap_or(&[])
    }
}

impl BoundingPoly {
    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn rect(&self) -> Option<(i32, i32, i32, i32)> {
        let xs = self.vertices.iter().map(|v| v.x);
        let ys = self.vertices.iter().map(|v| v.y);
        Some((xs.clone().min()?, ys.clone().min()?, xs.max()?, ys.max()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "responses": [{
            "textAnnotations": [
                {
                    "locale": "en",
                    "description": "ACME STORE\nTotal $9.99\n",
                    "boundingPoly": {"vertices": [{"x": 10, "y": 5}, {"x": 200, "y": 5}, {"x": 200, "y": 90}, {"y": 90}]}
                },
                {"description": "ACME", "boundingPoly": {"vertices": [{"x": 10, "y": 5}, {"x": 60, "y": 20}]}},
                {"description": "STORE"}
            ]
        }]
    }"#;

    #[test]
    fn test_full_text() {
        let response = AnnotateResponse::from_json(RESPONSE).unwrap();
        assert_eq!(response.full_text().unwrap(), "ACME STORE\nTotal $9.99\n");
    }

    #[test]
    fn test_word_annotations() {
        let response = AnnotateResponse::from_json(RESPONSE).unwrap();
        let words: Vec<&str> = response
            .annotations()
            .iter()
            .map(|a| a.description.as_str())
            .collect();
        assert_eq!(words, vec!["ACME", "STORE"]);
    }

    #[test]
    fn test_bounding_rect_with_omitted_zero() {
        let response = AnnotateResponse::from_json(RESPONSE).unwrap();
        let poly = response.responses[0].text_annotations[0]
            .bounding_poly
            .as_ref()
            .unwrap();
        assert_eq!(poly.rect(), Some((0, 5, 200, 90)));
        assert_eq!(BoundingPoly::default().rect(), None);
    }

    #[test]
    fn test_no_text_detected() {
        let response = AnnotateResponse::from_json(r#"{"responses": [{}]}"#).unwrap();
        assert!(matches!(response.full_text(), Err(OcrError::NoText)));
        assert!(response.annotations().is_empty());

        let response = AnnotateResponse::from_json("{}").unwrap();
        assert!(matches!(response.full_text(), Err(OcrError::NoText)));
    }

    #[test]
    fn test_api_error() {
        let body = r#"{"responses": [{"error": {"code": 3, "message": "Bad image data."}}]}"#;
        let response = AnnotateResponse::from_json(body).unwrap();
        let err = response.full_text().unwrap_err();
        assert_eq!(err.to_string(), "annotate request failed: Bad image data. (code 3)");
    }

    #[test]
    fn test_malformed_body() {
        assert!(AnnotateResponse::from_json("not json").is_err());
    }
}
