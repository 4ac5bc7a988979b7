#[cfg(test)]
mod tests {
    use std::io::BufWriter;

    use page_template::{ErrorKind, PaperSize, Pattern, TemplateError, TemplateOptions};

    /// Writes every combination of paper size and pattern to `target/reference_templates` so
    /// that they can be inspected in a PDF viewer.
    #[test]
    #[ignore]
    fn generate_reference_templates() {
        let output_directory = std::path::Path::new(env!("CARGO_TARGET_TMPDIR"))
            .join("..")
            .join("reference_templates");
        std::fs::create_dir_all(&output_directory).unwrap();

        for paper_size in PaperSize::ALL {
            for pattern in Pattern::ALL {
                let template =
                    page_template::render(&TemplateOptions::new(paper_size, pattern)).unwrap();
                let template_path = output_directory.join(format!("{}-{}.pdf", paper_size, pattern));
                let template_file = std::fs::File::create(&template_path)
                    .map_err(|error| {
                        TemplateError::with_error(
                            ErrorKind::EncodingError,
                            format!("Failed to create the reference template {:?}", template_path),
                            &error,
                        )
                    })
                    .unwrap();
                template.save(&mut BufWriter::new(template_file)).unwrap();
            }
        }
    }
}
