//! Fixtures shared by unit and router tests.

use bytes::Bytes;

use crate::models::resume::ResumeUpload;

/// Builds a PDF with one page per entry, each page drawing its entry as a single
/// line of Helvetica text. An empty entry produces a page with no text layer.
pub fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
    build_pdf(pages, false)
}

/// Same as `minimal_pdf`, with a Standard security handler dictionary referenced
/// from the trailer's `/Encrypt` entry.
pub fn encrypted_pdf(pages: &[&str]) -> Vec<u8> {
    build_pdf(pages, true)
}

fn build_pdf(pages: &[&str], encrypt: bool) -> Vec<u8> {
    let page_count = pages.len();
    let mut objects: Vec<String> = Vec::new();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    for (i, text) in pages.iter().enumerate() {
        let content_id = 5 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        let stream = if text.is_empty() {
            String::new()
        } else {
            format!("BT /F1 12 Tf 72 712 Td ({}) Tj ET", escape_pdf_string(text))
        };
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let encrypt_entry = if encrypt {
        objects.push(
            "<< /Filter /Standard /V 1 /R 2 /O (owner-key) /U (user-key) /P -4 >>".to_string(),
        );
        format!(" /Encrypt {} 0 R", objects.len())
    } else {
        String::new()
    };

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R{} >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            encrypt_entry,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

fn escape_pdf_string(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

pub fn upload(filename: &str, content: &[u8]) -> ResumeUpload {
    ResumeUpload {
        identifier: filename.to_string(),
        filename: filename.to_string(),
        content: Bytes::copy_from_slice(content),
    }
}
