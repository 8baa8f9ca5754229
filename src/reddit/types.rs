use crate::types::Dimensions;
use serde::{Deserialize, Deserializer, Serialize};

/// Reddit sends `null` for some fields; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ListingResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: ListingResponseData,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ListingResponseData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<ListingItem>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ListingItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Post,
}

/// A listing entry. Fields missing from the response decode to empty values
/// so that one odd post does not fail the whole listing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Post {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub preview: Option<Preview>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<PreviewImage>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewImage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: ImageSource,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: u32,
}

impl Post {
    /// Size reddit reports for the preview. Informational only, the real
    /// image size is read after download.
    pub fn preview_dimensions(&self) -> Option<Dimensions> {
        let source = &self.preview.as_ref()?.images.first()?.source;
        Some(Dimensions {
            width: source.width,
            height: source.height,
        })
    }

    /// File name stem for the saved image: the id with all spaces removed.
    pub fn file_stem(&self) -> String {
        self.id.replace(' ', "")
    }
}
