//! fvar synthesis over small fonts built in memory.

use read_fonts::types::{Fixed, NameId, Tag, Version16Dot16};
use statforge_font_fvar::{Error, FvarOptions, build_fvar, parse_axis_specs};
use statforge_font_ops::{
    FontHandle, FvarAxis, FvarInstance, FvarTable, NameRegistry, NameTable, TableModel,
};
use write_fonts::{
    FontBuilder,
    tables::{
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::FWord,
};

fn make_os2(
    weight: u16,
    width: u16,
    selection: SelectionFlags,
    optical: Option<(u16, u16)>,
) -> Os2 {
    Os2 {
        x_avg_char_width: 500,
        us_weight_class: weight,
        us_width_class: width,
        fs_type: 0,
        y_subscript_x_size: 650,
        y_subscript_y_size: 600,
        y_subscript_x_offset: 0,
        y_subscript_y_offset: 75,
        y_superscript_x_size: 650,
        y_superscript_y_size: 600,
        y_superscript_x_offset: 0,
        y_superscript_y_offset: 350,
        y_strikeout_size: 50,
        y_strikeout_position: 300,
        s_family_class: 0,
        panose_10: [0; 10],
        ul_unicode_range_1: 0,
        ul_unicode_range_2: 0,
        ul_unicode_range_3: 0,
        ul_unicode_range_4: 0,
        ach_vend_id: Tag::new(b"NONE"),
        fs_selection: selection,
        us_first_char_index: 0x20,
        us_last_char_index: 0x7E,
        s_typo_ascender: 700,
        s_typo_descender: -200,
        s_typo_line_gap: 0,
        us_win_ascent: 900,
        us_win_descent: 200,
        ul_code_page_range_1: Some(0),
        ul_code_page_range_2: Some(0),
        sx_height: Some(500),
        s_cap_height: Some(700),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        us_lower_optical_point_size: optical.map(|(lower, _)| lower),
        us_upper_optical_point_size: optical.map(|(_, upper)| upper),
    }
}

fn make_post(italic_angle: f64) -> Post {
    Post {
        version: Version16Dot16::VERSION_3_0,
        italic_angle: Fixed::from_f64(italic_angle),
        underline_position: FWord::new(-100),
        underline_thickness: FWord::new(50),
        is_fixed_pitch: 0,
        min_mem_type42: 0,
        max_mem_type42: 0,
        min_mem_type1: 0,
        max_mem_type1: 0,
        num_glyphs: None,
        glyph_name_index: None,
        string_data: None,
    }
}

#[derive(Default)]
struct TestFont<'a> {
    names: &'a [(u16, &'a str)],
    os2: Option<Os2>,
    post: Option<Post>,
    fvar: Option<FvarTable>,
}

impl<'a> TestFont<'a> {
    /// A font with a `post` table and no OS/2.
    fn with_post(names: &'a [(u16, &'a str)], italic_angle: f64) -> Self {
        Self { names, post: Some(make_post(italic_angle)), ..Default::default() }
    }

    fn build(&self) -> Vec<u8> {
        let mut name = NameTable::default();
        for &(id, value) in self.names {
            name.insert(NameId::new(id), value);
        }

        let mut builder = FontBuilder::new();
        builder.add_raw(NameTable::TAG, name.write().unwrap());
        if let Some(os2) = &self.os2 {
            builder.add_table(os2).unwrap();
        }
        if let Some(post) = &self.post {
            builder.add_table(post).unwrap();
        }
        if let Some(fvar) = &self.fvar {
            builder.add_raw(FvarTable::TAG, fvar.write().unwrap());
        }
        builder.build()
    }
}

fn wght_axis(min: f64, default: f64, max: f64) -> FvarAxis {
    FvarAxis { tag: Tag::new(b"wght"), min, default, max, flags: 0, name_id: NameId::new(256) }
}

/// Run a build and return the resulting fvar with the names it refers to.
fn run(
    path: &str,
    data: Vec<u8>,
    specs: &str,
    options: &FvarOptions,
) -> (FvarTable, NameRegistry, Vec<Error>) {
    let mut handle = FontHandle::from_data(path, data).unwrap();
    let mut names = NameRegistry::load(&handle).unwrap();
    let specs = parse_axis_specs(specs).unwrap();
    let report = build_fvar(&mut handle, &mut names, &specs, options).unwrap();
    names.commit(&mut handle).unwrap();

    let rebuilt = FontHandle::from_data(path, handle.to_bytes().unwrap()).unwrap();
    let fvar = rebuilt.table::<FvarTable>().unwrap().unwrap_or_default();
    (fvar, NameRegistry::load(&rebuilt).unwrap(), report.skipped)
}

#[test]
fn weight_class_gives_degenerate_axis_and_named_instance() {
    let font = TestFont {
        names: &[(1, "Sans"), (2, "Bold"), (6, "Sans-Bold")],
        os2: Some(make_os2(700, 5, SelectionFlags::BOLD, None)),
        ..Default::default()
    }
    .build();

    let (fvar, names, skipped) = run("Sans-Bold.ttf", font, "wght=*", &FvarOptions::default());
    assert!(skipped.is_empty());
    assert_eq!(fvar.axes.len(), 1);
    let axis = &fvar.axes[0];
    assert_eq!((axis.min, axis.default, axis.max), (700.0, 700.0, 700.0));
    assert_eq!(names.get_string(axis.name_id).unwrap(), "Weight");

    assert_eq!(fvar.instances.len(), 1);
    let instance = &fvar.instances[0];
    assert_eq!(instance.coordinates, vec![700.0]);
    assert_eq!(names.get_string(instance.subfamily_name_id).unwrap(), "Bold");
    assert_eq!(instance.postscript_name_id, Some(NameId::POSTSCRIPT_NAME));
}

#[test]
fn width_class_maps_to_percentage() {
    let font = TestFont {
        names: &[(2, "Regular")],
        os2: Some(make_os2(400, 3, SelectionFlags::REGULAR, None)),
        ..Default::default()
    }
    .build();

    let (fvar, _, _) = run("Sans.ttf", font, "wdth=*", &FvarOptions::default());
    assert_eq!(fvar.axes[0].default, 75.0);
    assert_eq!(fvar.instances[0].postscript_name_id, None);
}

#[test]
fn italic_bit_is_definitive() {
    let font = TestFont {
        names: &[(2, "Regular")],
        os2: Some(make_os2(400, 5, SelectionFlags::REGULAR, None)),
        post: Some(make_post(-12.0)),
        ..Default::default()
    }
    .build();

    // OS/2 says upright, so neither the angle nor the file name matter
    let (fvar, _, _) = run("Sans-Italic.ttf", font, "ital=*", &FvarOptions::default());
    assert_eq!(fvar.axes[0].default, 0.0);
}

#[test]
fn italic_falls_back_to_angle_then_file_name() {
    let slanted = TestFont::with_post(&[(2, "Italic")], -12.0);
    let (fvar, _, _) = run("Sans.ttf", slanted.build(), "ital=*", &FvarOptions::default());
    assert_eq!(fvar.axes[0].default, 1.0);

    let upright = TestFont::with_post(&[(2, "Regular")], 0.0);
    let (fvar, _, _) = run("Sans-Oblique.ttf", upright.build(), "ital=*", &FvarOptions::default());
    assert_eq!(fvar.axes[0].default, 1.0);

    let (fvar, _, _) = run("Sans.ttf", upright.build(), "ital=*", &FvarOptions::default());
    assert_eq!(fvar.axes[0].default, 0.0);
}

#[test]
fn slant_comes_from_italic_angle() {
    let font = TestFont::with_post(&[(2, "Italic")], -9.5);
    let (fvar, _, _) = run("Sans.ttf", font.build(), "slnt=*", &FvarOptions::default());
    assert_eq!(fvar.axes[0].default, -9.5);
}

#[test]
fn optical_size_uses_point_size_range() {
    let ranged = TestFont {
        names: &[(2, "Regular")],
        os2: Some(make_os2(400, 5, SelectionFlags::REGULAR, Some((180, 480)))),
        ..Default::default()
    };
    let (fvar, _, _) = run("Sans.ttf", ranged.build(), "opsz=*", &FvarOptions::default());
    assert_eq!(fvar.axes[0].default, 16.5);

    let open_ended = TestFont {
        names: &[(2, "Regular")],
        os2: Some(make_os2(400, 5, SelectionFlags::REGULAR, Some((240, 0xFFFF)))),
        ..Default::default()
    };
    let (fvar, _, _) = run("Sans.ttf", open_ended.build(), "opsz=*", &FvarOptions::default());
    assert_eq!(fvar.axes[0].default, 12.0);
}

#[test]
fn missing_source_skips_only_that_axis() {
    let font = TestFont::with_post(&[(2, "Regular")], 0.0);

    let (fvar, _, skipped) =
        run("Sans.ttf", font.build(), "wght=*, slnt=*", &FvarOptions::default());
    assert_eq!(fvar.axes.len(), 1);
    assert_eq!(fvar.axes[0].tag, Tag::new(b"slnt"));
    assert!(matches!(&skipped[..], [Error::NotFound { tag, .. }] if tag == "wght"));
}

#[test]
fn detected_default_widens_existing_axis() {
    let font = TestFont {
        names: &[(2, "Regular"), (256, "Weight")],
        os2: Some(make_os2(700, 5, SelectionFlags::REGULAR, None)),
        fvar: Some(FvarTable { axes: vec![wght_axis(300.0, 400.0, 600.0)], instances: vec![] }),
        ..Default::default()
    };

    let (fvar, _, _) = run("Sans.ttf", font.build(), "wght=*", &FvarOptions::default());
    let axis = &fvar.axes[0];
    assert_eq!((axis.min, axis.default, axis.max), (300.0, 700.0, 700.0));
    assert_eq!(axis.name_id, NameId::new(256));
}

#[test]
fn new_axis_extends_existing_instances() {
    let existing = FvarTable {
        axes: vec![wght_axis(100.0, 400.0, 900.0)],
        instances: vec![FvarInstance {
            subfamily_name_id: NameId::new(257),
            flags: 0,
            coordinates: vec![900.0],
            postscript_name_id: None,
        }],
    };
    let font = TestFont {
        names: &[(2, "Regular"), (256, "Weight"), (257, "Black")],
        fvar: Some(existing),
        ..Default::default()
    };

    let options = FvarOptions { style_name: Some("Book".into()) };
    let (fvar, names, _) = run("Sans.ttf", font.build(), "wdth=Breite=50:100:200", &options);

    assert_eq!(fvar.axes.len(), 2);
    assert_eq!(names.get_string(fvar.axes[1].name_id).unwrap(), "Breite");
    assert_eq!(fvar.instances.len(), 2);
    assert_eq!(fvar.instances[0].coordinates, vec![900.0, 100.0]);
    assert_eq!(fvar.instances[1].coordinates, vec![400.0, 100.0]);
    assert_eq!(names.get_string(fvar.instances[1].subfamily_name_id).unwrap(), "Book");
}

#[test]
fn explicit_range_replaces_existing_axis() {
    let font = TestFont {
        names: &[(2, "Regular"), (256, "Weight")],
        fvar: Some(FvarTable { axes: vec![wght_axis(300.0, 400.0, 600.0)], instances: vec![] }),
        ..Default::default()
    };

    let (fvar, _, _) = run("Sans.ttf", font.build(), "wght=100:400:900", &FvarOptions::default());
    let axis = &fvar.axes[0];
    assert_eq!((axis.min, axis.default, axis.max), (100.0, 400.0, 900.0));
    assert_eq!(fvar.instances.len(), 1);
}

#[test]
fn second_build_changes_nothing() {
    let font = TestFont {
        names: &[(2, "Bold"), (6, "Sans-Bold")],
        os2: Some(make_os2(700, 5, SelectionFlags::BOLD, None)),
        ..Default::default()
    }
    .build();

    let mut handle = FontHandle::from_data("Sans-Bold.ttf", font).unwrap();
    let mut names = NameRegistry::load(&handle).unwrap();
    let specs = parse_axis_specs("wght=*, ital=*").unwrap();
    build_fvar(&mut handle, &mut names, &specs, &FvarOptions::default()).unwrap();
    names.commit(&mut handle).unwrap();

    let mut again = FontHandle::from_data("Sans-Bold.ttf", handle.to_bytes().unwrap()).unwrap();
    let mut names = NameRegistry::load(&again).unwrap();
    let report = build_fvar(&mut again, &mut names, &specs, &FvarOptions::default()).unwrap();
    assert!(!report.changed);
    assert!(!names.commit(&mut again).unwrap());
    assert!(!again.is_modified());
}
