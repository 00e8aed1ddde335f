//! End-to-end conversion tests: PNG and project file in, PNG and index dump
//! out.

mod common;

use common::fixtures::{self, colors};
use common::Workspace;
use nes_quant::color::HARDWARE_COLORS;
use nes_quant::{PixelBuffer, Rgb, UNSET};
use pixeler::models::ProjectConfig;
use pixeler::services::{auto_palette_project, ConversionService};
use pretty_assertions::assert_eq;

#[test]
fn test_project_conversion_writes_png_and_indices() {
    let ws = Workspace::new();
    let input = ws.write_png("split.png", &fixtures::split_image());
    let project_path = ws.write_text("project.yaml", fixtures::RED_BLUE_PROJECT);
    let output = ws.path("out.png");
    let indices = ws.path("out.idx");

    let project = ProjectConfig::load(&project_path).unwrap();
    let service = ConversionService::from_project(&project).unwrap();
    let summary = service.convert_file(&input, &output, Some(&indices)).unwrap();

    assert_eq!(summary.colors, 2);
    assert_eq!(summary.unset, 0);

    let index = common::read_indices(&indices, 16, 8);
    common::assert_columns(&index, 0..8, 22);
    common::assert_columns(&index, 8..16, 2);

    let rgb = common::read_png(&output);
    assert_eq!(rgb.get(0, 0), HARDWARE_COLORS[22]);
    assert_eq!(rgb.get(15, 7), HARDWARE_COLORS[2]);
}

#[test]
fn test_large_source_is_sampled_down() {
    let ws = Workspace::new();
    let input = ws.write_png("ramp.png", &fixtures::grey_ramp());
    let project = ProjectConfig::from_yaml_str(
        "width: 8\nheight: 8\ndither:\n  style: floyd-steinberg\nknobs:\n  - color: 15\n  - color: 48\n",
    )
    .unwrap();

    let service = ConversionService::from_project(&project).unwrap();
    let output = ws.path("out.png");
    let indices = ws.path("out.idx");
    service.convert_file(&input, &output, Some(&indices)).unwrap();

    let index = common::read_indices(&indices, 8, 8);
    common::assert_fully_painted(&index);
    // Dark end black, bright end white
    assert_eq!(index.get(0, 0), 15);
    assert_eq!(index.get(7, 0), 48);
}

#[test]
fn test_colorless_knob_makes_transparent_pixels() {
    let ws = Workspace::new();
    let input = ws.write_png("split.png", &fixtures::split_image());
    let project = ProjectConfig::from_yaml_str(
        "width: 16\nheight: 8\nknobs:\n  - color: 22\n    targets: [\"#FF0000\"]\n  - color: null\n    targets: [\"#0000FF\"]\n",
    )
    .unwrap();

    let output = ws.path("out.png");
    let indices = ws.path("out.idx");
    let summary = ConversionService::from_project(&project)
        .unwrap()
        .convert_file(&input, &output, Some(&indices))
        .unwrap();
    assert_eq!(summary.unset, 64);

    let index = common::read_indices(&indices, 16, 8);
    common::assert_columns(&index, 8..16, UNSET);

    let bytes = common::assert_png_file(&output);
    let mut reader = png::Decoder::new(std::io::Cursor::new(bytes)).read_info().unwrap();
    assert_eq!(reader.info().color_type, png::ColorType::Rgba);
    let mut buf = vec![0; reader.output_buffer_size()];
    reader.next_frame(&mut buf).unwrap();
    // Alpha of (0, 0) and (15, 0)
    assert_eq!(buf[3], 255);
    assert_eq!(buf[15 * 4 + 3], 0);
}

#[test]
fn test_auto_palette_project_converts_cleanly() {
    let ws = Workspace::new();
    let input = ws.write_png("split.png", &fixtures::split_image());

    let project = auto_palette_project(&input, 2, true, 16, 8).unwrap();
    assert_eq!(project.knobs.len(), 2);

    // Survives a trip through YAML
    let project = ProjectConfig::from_yaml_str(&project.to_yaml().unwrap()).unwrap();

    let output = ws.path("out.png");
    let indices = ws.path("out.idx");
    ConversionService::from_project(&project)
        .unwrap()
        .convert_file(&input, &output, Some(&indices))
        .unwrap();

    let index = common::read_indices(&indices, 16, 8);
    common::assert_fully_painted(&index);
    let (left, right) = (index.get(0, 0), index.get(15, 0));
    assert_ne!(left, right);
    common::assert_columns(&index, 0..8, left);
    common::assert_columns(&index, 8..16, right);
}

#[test]
fn test_custom_mask_resolves_next_to_project() {
    let ws = Workspace::new();
    let input = ws.write_png("sky.png", &PixelBuffer::filled(16, 16, colors::SKY));
    ws.write_png(
        "mask.png",
        &PixelBuffer::from_fn(2, 2, |x, y| if (x + y) % 2 == 0 { Rgb::new(32, 32, 32) } else { Rgb::new(224, 224, 224) }),
    );
    let project_path = ws.write_text(
        "project.yaml",
        "width: 16\nheight: 16\ndither:\n  style: mask-custom\n  mask: mask.png\nknobs:\n  - color: 15\n  - color: 48\n",
    );

    let project = ProjectConfig::load(&project_path).unwrap();
    assert_eq!(project.mask_path(), Some(ws.root().join("mask.png")));

    let output = ws.path("out.png");
    let indices = ws.path("out.idx");
    ConversionService::from_project(&project)
        .unwrap()
        .convert_file(&input, &output, Some(&indices))
        .unwrap();

    // The checkerboard mask splits the flat colour into both knobs
    let index = common::read_indices(&indices, 16, 16);
    let hist = index.histogram();
    assert!(hist[15] > 0 && hist[48] > 0, "{} black, {} white", hist[15], hist[48]);
}

#[test]
fn test_unaligned_input_is_refused() {
    let ws = Workspace::new();
    let input = ws.write_png("odd.png", &PixelBuffer::filled(8, 12, colors::RED));
    let project = ProjectConfig::from_yaml_str(fixtures::RED_BLUE_PROJECT).unwrap();

    let err = ConversionService::from_project(&project)
        .unwrap()
        .convert_file(&input, &ws.path("out.png"), None)
        .unwrap_err();
    assert_eq!(err.to_string(), "Image height is not a multiple of 8.");
    assert!(!ws.path("out.png").exists());
}
