//! Layout and drawing of a canvas.
//!
//! The walk is depth-first, parent before children. Each element adds its
//! own `Left`/`Top` to the running origin, records its metadata, hands its
//! primitive to the rasterizer and then draws its children. Grids and rows
//! adjust their children's offsets before those children are drawn.

use log::{info, trace};

use screenc_core::{
    artifact::{Area, DrawResults, HotSpot, Location, NamedBitmap},
    color::Color,
    depth::ColorDepth,
    draw::{Primitive, Stroke},
    geometry::{Point, Rect, Size},
};

use crate::{
    error::{CompileError, ErrorKind},
    model::{ElementId, GraphicKind, Shape, Spots},
    session::CompileSession,
};

fn pixels(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn shape_stroke(shape: &Shape) -> Option<Stroke> {
    shape
        .stroke
        .map(|color| Stroke::new(color, shape.stroke_thickness))
}

fn record_spots(spots: &Spots, rect: Rect, results: &mut DrawResults) {
    if let Some(name) = &spots.hotspot {
        results.hotspots.push(HotSpot::new(
            name.as_str(),
            spots.group.clone().unwrap_or_default(),
            rect.x(),
            rect.y(),
            rect.width(),
            rect.height(),
        ));
    }
    if let Some(name) = &spots.area {
        results.areas.push(Area::new(
            name.as_str(),
            rect.x(),
            rect.y(),
            rect.width(),
            rect.height(),
        ));
    }
}

impl CompileSession<'_> {
    /// Draws a top-level canvas and stores the finished image.
    pub(crate) fn render_canvas(&mut self, id: ElementId) -> Result<(), CompileError> {
        let (line, span) = {
            let element = self.tree.get(id);
            (element.line, element.span)
        };
        let wrap = |kind: ErrorKind| CompileError::from(kind).wrap(line, span, None);
        self.prepare_canvas(id).map_err(wrap)?;

        let element = self.tree.get(id);
        let name = element.name.clone().unwrap_or_default();
        let (width, height) = (element.width(), element.height());
        let Some(GraphicKind::Canvas(_, layout)) = element.kind() else {
            return Ok(());
        };
        let stride = layout.stride;
        let depth_text = layout.color_depth.clone().unwrap_or_default();
        let type_tag = layout.type_tag.clone();

        info!(name = name.as_str(), width = width, height = height; "Drawing canvas");
        let mut results = DrawResults::new(pixels(width), pixels(height));
        self.draw_element(id, 0, 0, &mut results)?;

        let depth = depth_text.parse::<ColorDepth>().map_err(|_| {
            wrap(ErrorKind::InvalidColorDepth {
                canvas: name.clone(),
                value: depth_text.clone(),
            })
        })?;

        self.values.extend(results.values.iter().cloned());
        let bitmap = NamedBitmap::new(name, results, pixels(stride), depth, type_tag);
        info!(
            name = bitmap.name(),
            stride = bitmap.stride(),
            bytes = bitmap.byte_size(),
            hotspots = bitmap.hotspots().len();
            "Rendered canvas"
        );
        self.images.push(bitmap);
        Ok(())
    }

    /// Places the `Item` children of a canvas with `ItemWidth` side by side
    /// and sizes the canvas to fit them.
    fn prepare_canvas(&mut self, id: ElementId) -> Result<(), ErrorKind> {
        let element = self.tree.get(id);
        let item_width = match element.kind() {
            Some(GraphicKind::Canvas(_, layout)) if layout.item_width != 0 => layout.item_width,
            _ => return Ok(()),
        };
        let canvas_height = element.height();

        let mut count = 0;
        for child in element.children.clone() {
            let item = self.tree.get_mut(child);
            if item.graphic().is_some_and(|g| g.is_set()) {
                continue;
            }
            if !matches!(item.kind(), Some(GraphicKind::Item)) {
                return Err(ErrorKind::NonItemChild(item.tag.clone()));
            }

            item.left = Some(count * item_width + item.left.unwrap_or(0));
            if let Some(graphic) = item.graphic.as_mut() {
                if graphic.width == 0 {
                    graphic.width = item_width;
                }
                if graphic.height == 0 {
                    graphic.height = canvas_height;
                }
            }
            count += 1;
        }
        if count == 0 {
            return Err(ErrorKind::MissingItems);
        }

        if let Some(graphic) = self.tree.get_mut(id).graphic.as_mut()
            && let GraphicKind::Canvas(_, layout) = &mut graphic.kind
        {
            graphic.width = layout.round_width(count * item_width);
            trace!(items = count, width = graphic.width; "Laid out canvas items");
        }
        Ok(())
    }

    fn draw_element(
        &mut self,
        id: ElementId,
        x: i32,
        y: i32,
        results: &mut DrawResults,
    ) -> Result<(), CompileError> {
        let (line, span) = {
            let element = self.tree.get(id);
            (element.line, element.span)
        };
        self.draw_subtree(id, x, y, results)
            .map_err(|err| err.wrap(line, span, None))
    }

    fn draw_subtree(
        &mut self,
        id: ElementId,
        x: i32,
        y: i32,
        results: &mut DrawResults,
    ) -> Result<(), CompileError> {
        let element = self.tree.get(id);
        trace!(tag = element.tag(), line = element.line, x = x, y = y; "Drawing element");

        if element.graphic().is_some_and(|g| g.is_set()) {
            results.values.extend(element.recorded.iter().cloned());
            // a Set whose clauses recorded values may have none of its own
            if let Some(Ok(record)) = element.show_record() {
                results.values.push(record);
            }
        } else if let Some(record) = element.show_record() {
            results.values.push(record?);
        }

        let x = x + element.left.unwrap_or(0);
        let y = y + element.top.unwrap_or(0);
        self.draw_graphic(id, x, y, results)?;

        for child in self.tree.children(id).to_vec() {
            self.draw_element(child, x, y, results)?;
        }
        Ok(())
    }

    fn draw_graphic(
        &mut self,
        id: ElementId,
        x: i32,
        y: i32,
        results: &mut DrawResults,
    ) -> Result<(), CompileError> {
        let (is_grid, is_row) = match self.tree.get(id).kind() {
            None => return Ok(()),
            Some(kind) => (
                matches!(kind, GraphicKind::Grid(_)),
                matches!(kind, GraphicKind::Row),
            ),
        };
        if is_grid {
            self.layout_grid(id);
        }
        if is_row {
            self.layout_row(id)?;
        }
        self.resolve_size(id)?;

        let element = self.tree.get(id);
        let Some(graphic) = element.graphic() else {
            return Ok(());
        };
        let rect = Rect::from_xywh(x, y, graphic.width, graphic.height);

        if let Some(spots) = graphic.spots() {
            record_spots(spots, rect, results);
        }
        if let GraphicKind::HotSpot(spot) = &graphic.kind {
            let name = element.name().ok_or(ErrorKind::UnnamedHotSpot)?;
            results.hotspots.push(HotSpot::new(
                name,
                spot.group.clone().unwrap_or_default(),
                x,
                y,
                graphic.width,
                graphic.height,
            ));
        }

        if let Some(name) = &graphic.location {
            let point = match graphic.kind {
                GraphicKind::Ellipse(_) => {
                    if graphic.width % 2 != 0 || graphic.height % 2 != 0 {
                        return Err(ErrorKind::OddEllipse.into());
                    }
                    rect.center()
                }
                _ => rect.origin(),
            };
            results
                .locations
                .push(Location::new(name.as_str(), point.x(), point.y()));
        }

        let primitive = match &graphic.kind {
            GraphicKind::Rectangle(shape) | GraphicKind::Canvas(shape, _) => Primitive::Rectangle {
                fill: shape.fill,
                stroke: shape_stroke(shape),
                radius: Size::new(shape.radius_x, shape.radius_y),
            },
            GraphicKind::Ellipse(shape) => Primitive::Ellipse {
                fill: shape.fill,
                stroke: shape_stroke(shape),
            },
            GraphicKind::Line(line) => match line.stroke {
                Some(color) => Primitive::Line {
                    from: Point::new(line.x1, line.y1),
                    to: Point::new(line.x2, line.y2),
                    stroke: Stroke::new(color, line.thickness),
                },
                None => return Ok(()),
            },
            GraphicKind::TextBlock(run) => Primitive::Text {
                text: &run.text,
                font: &run.font,
                foreground: run.foreground.unwrap_or(Color::BLACK),
                background: run.background,
            },
            GraphicKind::Image(image) => match &image.bitmap {
                Some(bitmap) => Primitive::Bitmap { image: bitmap },
                None => return Err(ErrorKind::MissingImageSource.into()),
            },
            _ => return Ok(()),
        };
        self.rasterizer.paint(&mut results.surface, &primitive, rect);
        Ok(())
    }

    /// Fills in sizes left at 0 for variants that derive them at draw time.
    fn resolve_size(&mut self, id: ElementId) -> Result<(), ErrorKind> {
        let parent_size = self
            .tree
            .parent(id)
            .and_then(|parent| self.tree.get(parent).graphic())
            .filter(|g| !matches!(g.kind, GraphicKind::Ref) && (g.width > 0 || g.height > 0))
            .map(|g| Size::new(g.width, g.height));
        let measurer = self.measurer;
        let element = self.tree.get_mut(id);
        let (top, left) = (element.top, element.left);
        let Some(graphic) = element.graphic.as_mut() else {
            return Ok(());
        };

        match &graphic.kind {
            GraphicKind::Line(line) => {
                if graphic.height == 0 {
                    graphic.height = match parent_size {
                        Some(parent) => parent.height() - top.unwrap_or(0),
                        None => line.y1.max(line.y2) + line.thickness,
                    };
                }
                if graphic.width == 0 {
                    graphic.width = match parent_size {
                        Some(parent) => parent.width() - left.unwrap_or(0),
                        None => line.x1.max(line.x2) + line.thickness,
                    };
                }
            }
            GraphicKind::TextBlock(run) => {
                if let Some(parent) = parent_size {
                    if graphic.width == 0 && left.is_none() {
                        graphic.width = parent.width();
                    }
                    if graphic.height == 0 && top.is_none() {
                        graphic.height = parent.height();
                    }
                }
                if graphic.width == 0 || graphic.height == 0 {
                    let natural = measurer.measure(&run.text, &run.font).ceil();
                    if graphic.width == 0 {
                        graphic.width = natural.width();
                    }
                    if graphic.height == 0 {
                        graphic.height = natural.height();
                    }
                }
            }
            GraphicKind::Image(image) => {
                let bitmap = image.bitmap.as_ref().ok_or(ErrorKind::MissingImageSource)?;
                if graphic.width == 0 {
                    graphic.width = bitmap.width() as i32;
                }
                if graphic.height == 0 {
                    graphic.height = bitmap.height() as i32;
                }
            }
            GraphicKind::HotSpot(_) => {
                if let Some(parent) = parent_size {
                    if graphic.width == 0 {
                        graphic.width = parent.width();
                    }
                    if graphic.height == 0 {
                        graphic.height = parent.height();
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Stacks rows below each other and empties the grid's `Default`
    /// placeholders.
    fn layout_grid(&mut self, grid: ElementId) {
        let row_height = match self.tree.get(grid).kind() {
            Some(GraphicKind::Grid(layout)) => layout.row_height,
            _ => return,
        };

        let mut next = 0;
        for child in self.tree.children(grid).to_vec() {
            let element = self.tree.get_mut(child);
            let is_row = matches!(element.kind(), Some(GraphicKind::Row));
            let is_placeholder =
                matches!(element.kind(), Some(GraphicKind::Default { is_copy: false }));
            if is_row {
                let top = element.top.unwrap_or(0) + next;
                element.top = Some(top);
                next = top + row_height;
            } else if is_placeholder {
                self.tree.clear_children(child);
            }
        }
    }

    /// Places a row's columns side by side at the grid's column width.
    fn layout_row(&mut self, row: ElementId) -> Result<(), ErrorKind> {
        let column_width = match self
            .tree
            .parent(row)
            .and_then(|grid| self.tree.get(grid).kind())
        {
            Some(GraphicKind::Grid(layout)) => layout.column_width,
            _ => return Err(ErrorKind::RowOutsideGrid),
        };

        let mut next = 0;
        for child in self.tree.children(row).to_vec() {
            let element = self.tree.get_mut(child);
            if matches!(element.kind(), Some(GraphicKind::Default { is_copy: false })) {
                self.tree.clear_children(child);
                continue;
            }
            let left = element.left.unwrap_or(0) + next;
            element.left = Some(left);
            next = column_width + left;
        }
        Ok(())
    }
}
