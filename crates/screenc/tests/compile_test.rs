//! End-to-end compiles through the public `ScreenBuilder` API.

use screenc::{
    ErrorCategory, ScreenBuilder, ScreenError,
    artifact::ValueData,
    color::Color,
    config::{AppConfig, NameStyle},
};

fn compile(source: &str) -> screenc::Compilation {
    ScreenBuilder::default()
        .compile(source)
        .expect("Failed to compile")
}

#[test]
fn test_single_red_canvas() {
    let source = r#"<Screens>
  <Canvas Name="canvasName" Width="10" Height="10" ColorDepth="Color24bpp">
    <Rectangle Width="10" Height="10" Fill="Red" HotSpot="h1"/>
  </Canvas>
</Screens>"#;

    let builder = ScreenBuilder::default();
    let compilation = builder.compile(source).expect("Failed to compile");
    let export = builder.export(&compilation).expect("Failed to export");

    assert_eq!(export.binary.len(), 300);
    assert!(export.binary.chunks(3).all(|p| p == [0xFF, 0x00, 0x00]));
    assert_eq!(
        export.header.matches("\tDEFINE_HOTSPOT(\"h1\", \"\", 0, 0, 9, 9)\n").count(),
        1
    );
    assert!(export.header.contains("\nHOTSPOT_COUNT(\"canvasName\", 1)\n"));
    assert!(export.header.contains("\nSCREEN_FILE_LENGTH(300)\n"));
}

#[test]
fn test_component_clones_render_independently() {
    let source = r#"<Screens>
  <Component Name="Box">
    <Rectangle Name="r" Width="4" Height="4" Fill="Red"/>
  </Component>
  <Canvas Name="first" Width="10" Height="10" ColorDepth="Color24bpp">
    <Ref RefName="Box" Left="2"/>
    <Set>r.Fill = Blue</Set>
  </Canvas>
  <Canvas Name="second" Width="10" Height="10" ColorDepth="Color24bpp">
    <Ref RefName="Box" Left="5" Top="5"/>
  </Canvas>
</Screens>"#;

    let compilation = compile(source);
    let [first, second] = compilation.images() else {
        panic!("expected two images");
    };

    assert_eq!(first.surface().pixel(2, 0), Some(Color::rgb(0, 0, 0xFF)));
    assert_eq!(first.surface().pixel(0, 0), Some(Color::TRANSPARENT));
    assert_eq!(second.surface().pixel(5, 5), Some(Color::rgb(0xFF, 0, 0)));
    assert_eq!(second.surface().pixel(2, 0), Some(Color::TRANSPARENT));
}

#[test]
fn test_expression_offsets() {
    let source = r#"<Screens>
  <Set>a = 10</Set>
  <Canvas Name="c" Width="20" Height="30" ColorDepth="Color16bpp">
    <Rectangle Top="a+5" Width="2" Height="2" HotSpot="spot"/>
  </Canvas>
</Screens>"#;

    let compilation = compile(source);
    let spot = &compilation.images()[0].hotspots()[0];
    assert_eq!((spot.min_x, spot.min_y), (0, 15));

    let undefined = source.replace("a+5", "b+5");
    let err = ScreenBuilder::default().compile(&undefined).unwrap_err();
    let ScreenError::Compile { err, .. } = err else {
        panic!("expected a compile error, got {err:?}");
    };
    assert_eq!(err.category(), ErrorCategory::Evaluation);
    assert!(err.to_string().starts_with(
        "Error at line 4 setting attribute 'Top' to 'b+5':\ncould not evaluate expression"
    ));
}

#[test]
fn test_grid_columns_copy_default() {
    let source = r#"<Screens>
  <Canvas Name="grid" Width="20" Height="40" ColorDepth="Color8bpp">
    <Grid RowHeight="20" ColumnWidth="10">
      <Default><Rectangle Width="5" Height="5" Fill="Red" HotSpot="cell"/></Default>
      <Row><Column/></Row>
      <Row><Column/></Row>
    </Grid>
  </Canvas>
</Screens>"#;

    let compilation = compile(source);
    let tops: Vec<i32> = compilation.images()[0]
        .hotspots()
        .iter()
        .map(|spot| spot.min_y)
        .collect();
    assert_eq!(tops, vec![0, 20]);
}

#[test]
fn test_column_with_content_skips_default() {
    let source = r#"<Screens>
  <Canvas Name="grid" Width="20" Height="20" ColorDepth="Color8bpp">
    <Grid RowHeight="20" ColumnWidth="10">
      <Default><Rectangle Width="2" Height="2" Location="dflt"/></Default>
      <Row>
        <Column><Rectangle Width="2" Height="2" Location="own"/></Column>
        <Column/>
      </Row>
    </Grid>
  </Canvas>
</Screens>"#;

    let compilation = compile(source);
    let locations: Vec<(&str, i32)> = compilation.images()[0]
        .locations()
        .iter()
        .map(|l| (l.name.as_str(), l.x))
        .collect();
    assert_eq!(locations, vec![("own", 0), ("dflt", 10)]);
}

#[test]
fn test_item_width_canvas() {
    let source = r#"<Screens>
  <Canvas Name="strip" ItemWidth="8" Height="4" ColorDepth="Color8bpp">
    <Item Location="i0"/>
    <Item Location="i1"/>
    <Item Location="i2"/>
  </Canvas>
</Screens>"#;

    let compilation = compile(source);
    let image = &compilation.images()[0];
    assert_eq!(image.width(), 24);
    let xs: Vec<i32> = image.locations().iter().map(|l| l.x).collect();
    assert_eq!(xs, vec![0, 8, 16]);
}

#[test]
fn test_width_and_stride_multiples() {
    let source = r#"<Screens StrideMultiple="8">
  <Canvas Name="c" Width="5" Height="2" WidthMultiple="2" ColorDepth="Color16bpp"/>
</Screens>"#;

    let builder = ScreenBuilder::default();
    let compilation = builder.compile(source).expect("Failed to compile");
    let image = &compilation.images()[0];
    assert_eq!((image.width(), image.stride()), (6, 8));

    let export = builder.export(&compilation).expect("Failed to export");
    assert_eq!(export.binary.len(), 2 * 8 * 2);
    assert!(export.header.contains("\tIMAGE_STRIDE(8)\n\tIMAGE_DEPTH(Color16bpp)\n"));
}

#[test]
fn test_compiles_are_idempotent() {
    let source = r##"<Screens>
  <Color Name="Accent" Color="#336699"/>
  <Component Name="Key"><Rectangle Width="6" Height="6" Fill="Accent" HotSpot="k"/></Component>
  <Canvas Name="pad" Width="12" Height="6" ColorDepth="Color16bpp">
    <Ref RefName="Key"/>
    <Ref RefName="Key" Left="6"/>
  </Canvas>
</Screens>"##;

    let builder = ScreenBuilder::default();
    let first = builder.export(&builder.compile(source).unwrap()).unwrap();
    let second = builder.export(&builder.compile(source).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_no_declarations_carry_over() {
    let builder = ScreenBuilder::default();
    builder
        .compile(
            r#"<S>
  <Set>a = 3</Set>
  <Color Name="Accent" Color="Red"/>
  <Component Name="Box"><Rectangle Width="1" Height="1"/></Component>
</S>"#,
        )
        .expect("Failed to compile");

    let compilation = builder.compile("<S/>").unwrap();
    assert!(compilation.colors().is_empty());

    let err = builder
        .compile(r#"<S><Canvas Name="c" Width="a" Height="1" ColorDepth="Color8bpp"/></S>"#)
        .unwrap_err();
    assert!(matches!(err, ScreenError::Compile { .. }));

    let err = builder
        .compile(
            r#"<S><Canvas Name="c" Width="1" Height="1" ColorDepth="Color8bpp"><Ref RefName="Box"/></Canvas></S>"#,
        )
        .unwrap_err();
    assert!(err.to_string().contains("No component named 'Box' was found."));
}

#[test]
fn test_values_and_colors_reach_header() {
    let source = r#"<Screens>
  <Color Name="Accent" Color="0xA02040" ColorDepth="Color8bpp"/>
  <Set Name="Version" ShowValue="">2</Set>
  <Canvas Name="c" Width="4" Height="4" ColorDepth="Color8bpp">
    <Rectangle Name="label" ShowValue="Label" Value="7" Width="1" Height="1"/>
  </Canvas>
</Screens>"#;

    let builder = ScreenBuilder::default();
    let compilation = builder.compile(source).expect("Failed to compile");
    assert_eq!(compilation.colors()["Accent"], Color::rgb(0xB6, 0x24, 0x55));
    let names: Vec<(&str, &ValueData)> = compilation
        .values()
        .iter()
        .map(|v| (v.name.as_str(), &v.value))
        .collect();
    assert_eq!(
        names,
        vec![("Version", &ValueData::Int(2)), ("Label", &ValueData::Int(7))]
    );

    let header = builder.export(&compilation).unwrap().header;
    assert!(
        header.contains("\nSTART_COLORS()\n\tDEFINE_COLOR(\"Accent\", 0xB62455)\nEND_COLORS()\n")
    );
    assert!(header.contains(
        "\nSTART_VALUES()\n\tDEFINE_VALUE(\"Version\", 2)\n\tDEFINE_VALUE(\"Label\", 7)\nEND_VALUES()\n"
    ));
    assert!(header.contains("\nSTART_STR_VALUES()\nEND_STR_VALUES()\n"));
}

#[test]
fn test_identifier_names() {
    let source = r#"<Keypad>
  <Canvas Name="Keypad" Width="4" Height="2" ColorDepth="Color8bpp" Type="Pad">
    <Rectangle Width="2" Height="2" HotSpot="one" Group="Digit"/>
    <Rectangle Left="2" Width="2" Height="2" HotSpot="ok"/>
  </Canvas>
</Keypad>"#;

    let mut config = AppConfig::default();
    config.export.name_style = NameStyle::Identifier;
    let builder = ScreenBuilder::new(config);
    let export = builder.export(&builder.compile(source).unwrap()).unwrap();

    let expected_tail = "
START_HOTSPOTS(Keypad)
\tDEFINE_HOTSPOT(one, Digit, 0, 0, 1, 1)
\tDEFINE_HOTSPOT(ok, , 2, 0, 3, 1)
END_HOTSPOTS(Keypad)

HOTSPOT_COUNT(Keypad, 2)

START_GROUP(Digit)
\tGROUP_HOTSPOT(one, Digit, 0, 0, 1, 1)
END_GROUP(Digit)

START_GROUP()
\tGROUP_HOTSPOT(ok, , 2, 0, 3, 1)
END_GROUP()
";
    assert!(export.header.contains(expected_tail), "{}", export.header);
    assert!(export.header.contains(
        "\nSTART_SCREEN_Pad(Keypad)\n\tIMAGE_ADDRESS_Pad(0)\n\tIMAGE_SIZE_Pad(8)\n"
    ));
    assert!(!export.header.contains("\nSTART_SCREEN(Keypad)"));
}

#[test]
fn test_compile_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("screen.xml");
    std::fs::write(
        &path,
        r#"<S><Canvas Name="c" Width="2" Height="2" ColorDepth="Color8bpp"/></S>"#,
    )
    .unwrap();

    let compilation = ScreenBuilder::default().compile_path(&path).unwrap();
    assert_eq!(compilation.images()[0].name(), "c");

    let missing = ScreenBuilder::default().compile_path(dir.path().join("missing.xml"));
    assert!(matches!(missing, Err(ScreenError::Io(_))));
}

#[test]
fn test_malformed_document_is_parse_error() {
    let err = ScreenBuilder::default()
        .compile("<Screens><Canvas></Screens>")
        .unwrap_err();
    assert!(matches!(err, ScreenError::Parse { .. }));
}
