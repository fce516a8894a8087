use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_decimal::Decimal;

use crate::errors::ServiceError;

/// Renders the one-page paperwork PDFs: a fixed set of label/value lines at
/// fixed vertical offsets, written to `<dir>/<kind>_<id>.pdf`.
#[derive(Debug, Clone)]
pub struct DocumentService {
    dir: PathBuf,
}

impl DocumentService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn invoice_pdf(
        &self,
        id: i64,
        order_id: i64,
        total_amount: Decimal,
    ) -> Result<String, ServiceError> {
        self.render(
            &format!("invoice_{}.pdf", id),
            "Invoice",
            &[
                ("Invoice ID", id.to_string()),
                ("Order ID", order_id.to_string()),
                ("Total Amount", total_amount.to_string()),
            ],
        )
    }

    pub fn receipt_pdf(&self, id: i64, payment_id: i64) -> Result<String, ServiceError> {
        self.render(
            &format!("receipt_{}.pdf", id),
            "Receipt",
            &[
                ("Receipt ID", id.to_string()),
                ("Payment ID", payment_id.to_string()),
            ],
        )
    }

    pub fn delivery_note_pdf(&self, id: i64, order_id: i64) -> Result<String, ServiceError> {
        self.render(
            &format!("delivery_note_{}.pdf", id),
            "Delivery Note",
            &[
                ("Delivery Note ID", id.to_string()),
                ("Order ID", order_id.to_string()),
            ],
        )
    }

    fn render(
        &self,
        filename: &str,
        title: &str,
        lines: &[(&str, String)],
    ) -> Result<String, ServiceError> {
        // US letter
        let (doc, page, layer) = PdfDocument::new(title, Mm(215.9), Mm(279.4), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ServiceError::DocumentError(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        let offsets = [Mm(260.0), Mm(252.0), Mm(244.0), Mm(236.0)];
        for ((label, value), y) in lines.iter().zip(offsets) {
            layer.use_text(format!("{}: {}", label, value), 12.0, Mm(30.0), y, &font);
        }

        std::fs::create_dir_all(&self.dir)
            .map_err(|e| ServiceError::DocumentError(e.to_string()))?;
        let path = self.dir.join(filename);
        let file = File::create(&path).map_err(|e| ServiceError::DocumentError(e.to_string()))?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| ServiceError::DocumentError(e.to_string()))?;

        Ok(path.to_string_lossy().into_owned())
    }
}
