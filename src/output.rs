use std::fs;
use std::path::Path;

use csv::Writer;

use crate::errors::Result;
use crate::feature_extraction::FeatureRecord;

/// Write the full feature record as pretty JSON to
/// `<output>/json/<name>_analysis.json`
pub fn write_feature_json<P: AsRef<Path>>(
    record: &FeatureRecord,
    output_dir: P,
    filename: &str,
) -> Result<()> {
    let json_dir = output_dir.as_ref().join("json");
    fs::create_dir_all(&json_dir)?;

    let output_path = json_dir.join(format!("{}_analysis.json", filename));
    let content = serde_json::to_string_pretty(record)?;
    fs::write(output_path, content)?;

    Ok(())
}

/// Append one row per analyzed image to `<output>/features.csv`, writing the
/// header only when the file is new
pub fn append_summary_csv<P: AsRef<Path>>(
    record: &FeatureRecord,
    output_dir: P,
    filename: &str,
) -> Result<()> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let summary_path = output_dir.join("features.csv");
    let file_exists = summary_path.exists();

    let mut writer = if file_exists {
        Writer::from_writer(
            fs::OpenOptions::new()
                .append(true)
                .open(&summary_path)?,
        )
    } else {
        let mut writer = Writer::from_path(&summary_path)?;

        // Write header only for new file
        writer.write_record([
            "ID",
            "Body_Color",
            "Hue",
            "Saturation",
            "Brightness",
            "Coating_Thickness",
            "Coating_Color",
            "Edge_Density",
            "Texture_Variance",
            "Shape_Type",
            "Circularity",
            "Area",
            "Texture_Complexity",
            "Has_Teeth_Marks",
            "Summary",
        ])?;

        writer
    };

    writer.write_record(&[
        filename.to_string(),
        record.tongue_color.class.label().to_string(),
        format!("{:.6}", record.tongue_color.hue),
        format!("{:.6}", record.tongue_color.saturation),
        format!("{:.6}", record.tongue_color.brightness),
        record.coating.thickness.label().to_string(),
        record.coating.color.label().to_string(),
        format!("{:.6}", record.coating.edge_density),
        format!("{:.6}", record.coating.texture_variance),
        record.shape.class.label().to_string(),
        format!("{:.6}", record.shape.circularity),
        format!("{:.1}", record.shape.area),
        format!("{:.6}", record.texture.complexity),
        record.texture.has_teeth_marks.to_string(),
        record.summary.clone(),
    ])?;

    writer.flush()?;

    Ok(())
}

/// Print the human-readable analysis report for a single image
pub fn print_report(record: &FeatureRecord, source: &str) {
    println!("{}", "=".repeat(60));
    println!("Tongue image analysis: {}", source);
    println!("{}", "=".repeat(60));

    println!("\n[Body color]");
    println!("  Type: {}", record.tongue_color.class);
    println!("  Description: {}", record.tongue_color.description);
    println!("  Hue: {:.1}", record.tongue_color.hue);
    println!("  Saturation: {:.1}", record.tongue_color.saturation);
    println!("  Brightness: {:.1}", record.tongue_color.brightness);

    println!("\n[Coating]");
    println!("  Thickness: {}", record.coating.thickness);
    println!("  Color: {}", record.coating.color);
    println!("  Description: {}", record.coating.description);
    println!("  Edge density: {:.3}", record.coating.edge_density);
    println!("  Texture variance: {:.2}", record.coating.texture_variance);

    println!("\n[Shape]");
    println!("  Type: {}", record.shape.class);
    println!("  Circularity: {:.3}", record.shape.circularity);
    println!("  Area: {:.1}", record.shape.area);
    println!("  Description: {}", record.shape.description);

    println!("\n[Surface texture]");
    println!("  Complexity: {:.2}", record.texture.complexity);
    println!("  Tooth-marks suspected: {}", record.texture.has_teeth_marks);
    println!("  Features: {}", record.texture.features.join(", "));

    println!("\n[Summary]");
    println!("  {}", record.summary);
    println!("\n{}", "=".repeat(60));
}
