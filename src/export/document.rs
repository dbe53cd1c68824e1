use super::{ExportError, PAGE_SIZE_POINTS};
use flate2::{write::ZlibEncoder, Compression};
use image::RgbaImage;
use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, ObjectId, Stream,
};
use std::io::Write;

const IMAGE_NAME: &str = "Im0";

/// A PDF document made of full page images.
///
/// Pages keep the order they're added in and every image is stretched to cover its whole page.
pub(crate) struct PdfDocument {
    document: Document,
    pages_id: ObjectId,
    pages: Vec<ObjectId>,
    title: String,
}

impl PdfDocument {
    pub(crate) fn new(title: &str) -> Self {
        let mut document = Document::with_version("1.5");
        // Pages point to their parent so its id needs to exist before any page does.
        let pages_id = document.new_object_id();
        Self { document, pages_id, pages: Vec::new(), title: title.to_string() }
    }

    /// Add a page that shows the given image.
    pub(crate) fn add_page(&mut self, image: &RgbaImage) -> Result<(), ExportError> {
        let (width, height) = image.dimensions();
        let rgb: Vec<u8> = image.pixels().flat_map(|pixel| [pixel[0], pixel[1], pixel[2]]).collect();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&rgb)?;
        let data = encoder.finish()?;

        let image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(width.into()),
            "Height" => Object::Integer(height.into()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => "FlateDecode",
        };
        let image_id = self.document.add_object(Stream::new(image_dict, data));

        let (page_width, page_height) = PAGE_SIZE_POINTS;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(page_width),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(page_height),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.into())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = self.document.add_object(Stream::new(dictionary! {}, content.encode()?));

        let media_box =
            vec![Object::Integer(0), Object::Integer(0), Object::Real(page_width), Object::Real(page_height)];
        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(self.pages_id),
            "MediaBox" => media_box,
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_NAME => Object::Reference(image_id),
                },
            },
        });
        self.pages.push(page_id);
        Ok(())
    }

    pub(crate) fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Finish the document and write it.
    pub(crate) fn save<W: Write>(mut self, writer: &mut W) -> Result<(), ExportError> {
        let kids: Vec<Object> = self.pages.iter().copied().map(Object::Reference).collect();
        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
        };
        self.document.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(self.pages_id),
        });
        let info_id = self.document.add_object(dictionary! {
            "Title" => Object::string_literal(self.title.as_str()),
            "Producer" => Object::string_literal(env!("CARGO_PKG_NAME")),
        });
        self.document.trailer.set("Root", Object::Reference(catalog_id));
        self.document.trailer.set("Info", Object::Reference(info_id));
        self.document.save_to(writer)?;
        Ok(())
    }
}
