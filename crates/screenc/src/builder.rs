//! Builds the element tree from the source tree.
//!
//! Elements are built depth-first in document order. For each node the
//! builder applies attributes, runs the graphic's completion step, assigns
//! text content and then builds the children. Any error is wrapped with the
//! node's line the first time it leaves a node.

use log::{debug, trace};

use screenc_core::artifact::ShowValue;
use screenc_parser::{Attribute, SourceNode};

use crate::{
    error::{AttributeContext, CompileError, ErrorKind},
    expr::{ExprError, Value, eval_int, eval_string},
    model::{Declaration, Element, ElementId, Graphic, GraphicKind, parse_multiple},
    session::CompileSession,
    set_clause::{SetContent, SetKind, parse_set_content},
};

fn context(attribute: &Attribute) -> AttributeContext {
    AttributeContext {
        name: attribute.name().to_string(),
        value: attribute.value().to_string(),
    }
}

impl CompileSession<'_> {
    /// Compiles every top-level element below `root`.
    ///
    /// `Component`s are registered, `Canvas`es are drawn into images and any
    /// other element is built for its side effects and dropped.
    pub(crate) fn compile_document(&mut self, root: &SourceNode) -> Result<(), CompileError> {
        self.apply_root_attributes(root)?;

        for node in root.children() {
            match node.tag() {
                "Component" => self.define_component(node)?,
                "Canvas" => {
                    let canvas = self.build_element(node, None)?;
                    self.render_canvas(canvas)?;
                }
                _ => {
                    self.build_element(node, None)?;
                }
            }
        }
        Ok(())
    }

    fn apply_root_attributes(&mut self, root: &SourceNode) -> Result<(), CompileError> {
        for attribute in root.attributes() {
            let target = match attribute.name() {
                "StrideMultiple" => &mut self.settings.stride_multiple,
                "WidthMultiple" => &mut self.settings.width_multiple,
                _ => continue,
            };
            *target = parse_multiple(attribute.name(), attribute.value(), &self.registries.env)
                .map_err(|kind| {
                    CompileError::from(kind).wrap(
                        root.line(),
                        attribute.value_span(),
                        Some(context(attribute)),
                    )
                })?;
        }
        Ok(())
    }

    fn define_component(&mut self, node: &SourceNode) -> Result<(), CompileError> {
        let id = self.build_element(node, None)?;
        let wrap = |kind: ErrorKind| CompileError::from(kind).wrap(node.line(), node.span(), None);

        let name = self
            .tree
            .get(id)
            .name()
            .map(str::to_string)
            .ok_or_else(|| wrap(ErrorKind::UnnamedComponent))?;
        if self.registries.components.contains_key(&name) {
            return Err(wrap(ErrorKind::DuplicateComponent(name)));
        }

        debug!(name = name.as_str(), line = node.line(); "Registered component");
        self.registries.components.insert(name, id);
        Ok(())
    }

    /// Builds `node` and its subtree. The new element is not appended to
    /// `parent`'s children; the caller does that.
    pub(crate) fn build_element(
        &mut self,
        node: &SourceNode,
        parent: Option<ElementId>,
    ) -> Result<ElementId, CompileError> {
        trace!(tag = node.tag(), line = node.line(); "Building element");
        let graphic = Graphic::for_tag(
            node.tag(),
            self.settings.stride_multiple,
            self.settings.width_multiple,
        );
        let id = self.tree.alloc(Element::new(
            node.tag(),
            graphic,
            parent,
            node.line(),
            node.span(),
        ));

        let mut current = None;
        self.fill_element(id, node, &mut current)
            .map_err(|err| match current {
                Some(attribute) => err.wrap(
                    node.line(),
                    attribute.value_span(),
                    Some(context(attribute)),
                ),
                None => err.wrap(node.line(), node.span(), None),
            })?;
        Ok(id)
    }

    fn fill_element<'n>(
        &mut self,
        id: ElementId,
        node: &'n SourceNode,
        current: &mut Option<&'n Attribute>,
    ) -> Result<(), CompileError> {
        if node.children().is_empty() {
            self.substitute_default(id);
        }

        for attribute in node.attributes() {
            *current = Some(attribute);
            self.apply_attribute(id, attribute.name(), attribute.value())?;
        }
        *current = None;

        self.complete_element(id)?;

        let recorded = match node.text() {
            Some(text) => self.apply_content(id, text)?,
            None => 0,
        };

        for child in node.children() {
            let child_id = self.build_element(child, Some(id))?;
            self.tree.append_child(id, child_id);
        }

        self.record_set_value(id, recorded)
    }

    /// Fills an empty `Column` with a copy of the nearest `Default`: the
    /// row's own when its first child is one, otherwise the grid's.
    fn substitute_default(&mut self, column: ElementId) {
        if !matches!(self.tree.get(column).kind(), Some(GraphicKind::Column)) {
            return;
        }
        let Some(row) = self.tree.parent(column) else {
            return;
        };

        let is_copy = |element: &Element| {
            matches!(element.kind(), Some(GraphicKind::Default { is_copy: true }))
        };
        let content = match self.tree.children(row).first() {
            Some(first) if !is_copy(self.tree.get(*first)) => Some(row),
            _ => self.tree.parent(row),
        };
        let Some(template) = content.and_then(|c| self.tree.children(c).first().copied()) else {
            return;
        };
        if !matches!(self.tree.get(template).kind(), Some(GraphicKind::Default { .. })) {
            return;
        }

        let (line, span) = {
            let element = self.tree.get(column);
            (element.line, element.span)
        };
        self.tree.clone_into(template, column);
        let element = self.tree.get_mut(column);
        element.line = line;
        element.span = span;
        if let Some(graphic) = element.graphic.as_mut() {
            graphic.kind = GraphicKind::Default { is_copy: true };
        }
        trace!(line = line; "Filled column from default");
    }

    /// Applies one attribute, trying the element-level names before the
    /// graphic's table.
    pub(crate) fn apply_attribute(
        &mut self,
        id: ElementId,
        name: &str,
        value: &str,
    ) -> Result<(), CompileError> {
        match name {
            "Name" => self.tree.get_mut(id).name = Some(value.to_string()),
            "Top" => {
                let top = eval_int(value, &self.registries.env)?;
                self.tree.get_mut(id).top = Some(top);
            }
            "Left" => {
                let left = eval_int(value, &self.registries.env)?;
                self.tree.get_mut(id).left = Some(left);
            }
            "Value" => self.assign_value(id, value)?,
            "ShowValue" => self.tree.get_mut(id).show_value = Some(value.to_string()),
            "RefName" if matches!(self.tree.get(id).kind(), Some(GraphicKind::Ref)) => {
                self.instantiate(id, value)?;
            }
            _ => {
                let scope = self.registries.scope(self.base_dir);
                match self.tree.get_mut(id).graphic.as_mut() {
                    Some(graphic) => graphic.set_attribute(name, value, &scope)?,
                    None => return Err(ErrorKind::UnknownAttribute(name.to_string()).into()),
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, kind: SetKind, text: &str) -> Result<Value, ExprError> {
        match kind {
            SetKind::Set => Ok(Value::Int(eval_int(text, &self.registries.env)?)),
            SetKind::SetString => Ok(Value::Str(eval_string(text, &self.registries.env)?)),
        }
    }

    fn assign_value(&mut self, id: ElementId, text: &str) -> Result<(), CompileError> {
        let element = self.tree.get(id);
        let name = element.name.clone().ok_or(ErrorKind::ValueWithoutName)?;
        let kind = match element.kind() {
            Some(GraphicKind::SetString(_)) => SetKind::SetString,
            _ => SetKind::Set,
        };

        let value = self.evaluate(kind, text)?;
        self.registries.env.set(name, value.clone());
        self.tree.get_mut(id).value = Some(value);
        Ok(())
    }

    /// Turns a `Ref` into a copy of the named component. The `Ref` keeps its
    /// own source position and any offsets the component leaves unset.
    fn instantiate(&mut self, id: ElementId, component: &str) -> Result<(), CompileError> {
        let template = *self
            .registries
            .components
            .get(component)
            .ok_or_else(|| ErrorKind::UnknownComponent(component.to_string()))?;

        let previous = self.tree.get(id).clone();
        self.tree.clone_into(template, id);

        let element = self.tree.get_mut(id);
        element.line = previous.line;
        element.span = previous.span;
        if element.graphic.is_none() {
            element.graphic = previous.graphic;
        }
        if element.top.is_none() {
            element.top = previous.top;
        }
        if element.left.is_none() {
            element.left = previous.left;
        }
        trace!(component = component, line = previous.line; "Instantiated component");
        Ok(())
    }

    /// Registers fonts and colors once their attributes are complete.
    fn complete_element(&mut self, id: ElementId) -> Result<(), CompileError> {
        let element = self.tree.get_mut(id);
        let Some(graphic) = element.graphic.as_mut() else {
            return Ok(());
        };
        let Some(declaration) = graphic.complete()? else {
            return Ok(());
        };
        let name = element.name.clone();

        match declaration {
            Declaration::Font(spec) => {
                let name = name.ok_or(ErrorKind::UnnamedDeclaration("Font"))?;
                debug!(name = name.as_str(), size = spec.size(); "Registered font");
                self.registries.fonts.insert(name, spec);
            }
            Declaration::Color(color) => {
                let name = name.ok_or(ErrorKind::UnnamedDeclaration("Color"))?;
                debug!(name = name.as_str(), color = color.to_string(); "Registered color");
                self.registries.colors.insert(name, color);
            }
        }
        Ok(())
    }

    /// Applies text content. Returns how many values a `Set` recorded.
    fn apply_content(&mut self, id: ElementId, text: &str) -> Result<usize, CompileError> {
        let (kind, ref_name) = match self.tree.get(id).kind() {
            Some(GraphicKind::TextBlock(_)) => (None, None),
            Some(GraphicKind::Set(target)) => (Some(SetKind::Set), target.ref_name.clone()),
            Some(GraphicKind::SetString(target)) => {
                (Some(SetKind::SetString), target.ref_name.clone())
            }
            _ => return Ok(0),
        };

        match kind {
            Some(kind) => self.run_set(id, kind, ref_name, text),
            None => {
                self.set_text(id, text);
                Ok(0)
            }
        }
    }

    /// Stores the text of a `TextBlock`. A named block is measured right
    /// away so later expressions can read `Name.Width` and `Name.Height`.
    fn set_text(&mut self, id: ElementId, text: &str) {
        let measurer = self.measurer;
        let element = self.tree.get_mut(id);
        let Some(graphic) = element.graphic.as_mut() else {
            return;
        };
        let GraphicKind::TextBlock(run) = &mut graphic.kind else {
            return;
        };
        run.text = text.trim().to_string();

        let Some(name) = element.name.clone() else {
            return;
        };
        let measured = measurer.measure(&run.text, &run.font).ceil();
        let width = if graphic.width != 0 {
            graphic.width
        } else {
            measured.width()
        };
        let height = if graphic.height != 0 {
            graphic.height
        } else {
            measured.height()
        };
        self.registries
            .env
            .set(name, Value::Size { width, height });
    }

    fn run_set(
        &mut self,
        id: ElementId,
        kind: SetKind,
        ref_name: Option<String>,
        text: &str,
    ) -> Result<usize, CompileError> {
        let element = self.tree.get(id);
        let accepts_value = element.name.is_some() && element.value.is_none();
        let shows = element.show_value.is_some();

        let clauses = match parse_set_content(text, kind, ref_name.is_some(), accepts_value)? {
            SetContent::Value(expr) => {
                self.assign_value(id, &expr)?;
                return Ok(0);
            }
            SetContent::Assignments(clauses) => clauses,
        };

        let mut recorded = 0;
        for clause in clauses {
            match clause.target.or_else(|| ref_name.clone()) {
                Some(target) => {
                    self.assign_targets(id, kind, &target, &clause.attribute, &clause.value)?;
                }
                None => {
                    let value = self.evaluate(kind, &clause.value)?;
                    match value.to_data() {
                        Some(data) if shows => {
                            let record = ShowValue::new(clause.attribute, data);
                            self.tree.get_mut(id).recorded.push(record);
                            recorded += 1;
                        }
                        _ => self.registries.env.set(clause.attribute, value),
                    }
                }
            }
        }
        Ok(recorded)
    }

    /// Applies `attribute = text` to the elements named `target` below the
    /// `Set`'s parent.
    fn assign_targets(
        &mut self,
        id: ElementId,
        kind: SetKind,
        target: &str,
        attribute: &str,
        text: &str,
    ) -> Result<(), CompileError> {
        let not_found = || ErrorKind::SetTargetNotFound {
            keyword: kind.keyword(),
            name: target.to_string(),
        };
        let scope = self.tree.parent(id).ok_or_else(not_found)?;
        let targets = self
            .tree
            .find_named(scope, target, self.settings.set_targets);
        if targets.is_empty() {
            return Err(not_found().into());
        }

        let value = match kind {
            SetKind::Set => text.to_string(),
            SetKind::SetString => eval_string(text, &self.registries.env)?,
        };
        trace!(
            target = target,
            attribute = attribute,
            matches = targets.len();
            "Applying set clause"
        );
        for element in targets {
            self.apply_attribute(element, attribute, &value)?;
        }
        Ok(())
    }

    /// Checks the `ShowValue` of a `Set` or `SetString`. Clauses that
    /// recorded their own values satisfy the request.
    ///
    /// Sets inside a canvas or component record when drawn, once per drawn
    /// instance. Any other `Set` is never drawn and records right away.
    fn record_set_value(&mut self, id: ElementId, recorded: usize) -> Result<(), CompileError> {
        let element = self.tree.get(id);
        if !element.graphic().is_some_and(Graphic::is_set) {
            return Ok(());
        }
        let own = match element.show_record() {
            Some(Ok(record)) => Some(record),
            Some(Err(err)) if recorded == 0 => return Err(err.into()),
            _ => None,
        };
        if self.is_drawn(id) {
            return Ok(());
        }
        self.values.extend(self.tree.get(id).recorded.iter().cloned());
        self.values.extend(own);
        Ok(())
    }

    /// Whether `id` belongs to a `Canvas` or a `Component` template.
    fn is_drawn(&self, id: ElementId) -> bool {
        let mut top = id;
        while let Some(parent) = self.tree.parent(top) {
            top = parent;
        }
        matches!(self.tree.get(top).tag(), "Canvas" | "Component")
    }
}

#[cfg(test)]
mod tests {
    use screenc_core::{artifact::ValueData, color::Color, draw::SoftwareRasterizer};
    use screenc_parser::parse_document;

    use super::*;
    use crate::config::{CompileConfig, SetTargetPolicy};

    fn build<'a>(
        backend: &'a SoftwareRasterizer,
        config: &CompileConfig,
        source: &str,
    ) -> (CompileSession<'a>, Result<(), CompileError>) {
        let root = parse_document(source).unwrap();
        let mut session = CompileSession::new(config, None, backend, backend);
        let result = session.compile_document(&root);
        (session, result)
    }

    fn fill_of(session: &CompileSession<'_>, id: ElementId) -> Option<Color> {
        match session.tree.get(id).kind() {
            Some(GraphicKind::Rectangle(shape)) => shape.fill,
            _ => None,
        }
    }

    #[test]
    fn test_top_level_set_writes_environment() {
        let backend = SoftwareRasterizer::new();
        let (session, result) = build(
            &backend,
            &CompileConfig::default(),
            r#"<Screens><Set>a = 10; b = a * 2</Set><SetString>t = "n" + b</SetString></Screens>"#,
        );
        result.unwrap();
        assert_eq!(session.registries.env.get("a"), Some(&Value::Int(10)));
        assert_eq!(session.registries.env.get("b"), Some(&Value::Int(20)));
        assert_eq!(
            session.registries.env.get("t"),
            Some(&Value::Str("n20".to_string()))
        );
    }

    #[test]
    fn test_value_requires_name() {
        let backend = SoftwareRasterizer::new();
        let (_, result) = build(
            &backend,
            &CompileConfig::default(),
            "<Screens>\n<Set Value=\"3\" Name=\"x\"/></Screens>",
        );
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error at line 2 setting attribute 'Value' to '3':\nName property must be set before setting Value."
        );
    }

    #[test]
    fn test_components_register_once() {
        let backend = SoftwareRasterizer::new();
        let (session, result) = build(
            &backend,
            &CompileConfig::default(),
            r#"<Screens><Component Name="Box"><Rectangle Width="4" Height="4"/></Component></Screens>"#,
        );
        result.unwrap();
        assert!(session.registries.components.contains_key("Box"));

        let (_, result) = build(
            &backend,
            &CompileConfig::default(),
            "<Screens>\n<Component Name=\"Box\"/>\n<Component Name=\"Box\"/></Screens>",
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "Error at line 3:\nA component named 'Box' is already defined."
        );

        let (_, result) = build(&backend, &CompileConfig::default(), "<S><Component/></S>");
        assert_eq!(
            result.unwrap_err().kind(),
            &ErrorKind::UnnamedComponent
        );
    }

    #[test]
    fn test_ref_clones_are_independent() {
        let backend = SoftwareRasterizer::new();
        let source = r#"<Screens>
<Component Name="Box"><Rectangle Name="r" Width="4" Height="4" Fill="Red"/></Component>
<Group>
  <Ref RefName="Box" Name="first" Left="3"/>
  <Ref RefName="Box"/>
  <Set>r.Fill = Blue</Set>
</Group>
</Screens>"#;
        let config = CompileConfig {
            set_targets: SetTargetPolicy::FirstMatch,
            ..CompileConfig::default()
        };
        let (session, result) = build(&backend, &config, source);
        result.unwrap();

        let template = session.registries.components["Box"];
        let template_rect = session.tree.children(template)[0];
        assert_eq!(fill_of(&session, template_rect), Some(Color::rgb(0xFF, 0, 0)));

        let refs: Vec<ElementId> = session
            .tree
            .ids()
            .filter(|id| session.tree.get(*id).tag() == "Ref")
            .collect();
        assert_eq!(refs.len(), 2);

        let first = session.tree.get(refs[0]);
        assert_eq!(first.name(), Some("first"));
        assert_eq!(first.left, Some(3));
        assert_eq!(first.line, 4);
        assert_eq!(session.tree.get(refs[1]).name(), Some("Box"));

        let first_rect = session.tree.children(refs[0])[0];
        let second_rect = session.tree.children(refs[1])[0];
        assert_ne!(first_rect, template_rect);
        assert_eq!(fill_of(&session, first_rect), Some(Color::rgb(0, 0, 0xFF)));
        assert_eq!(fill_of(&session, second_rect), Some(Color::rgb(0xFF, 0, 0)));
    }

    #[test]
    fn test_set_broadcasts_to_every_match() {
        let backend = SoftwareRasterizer::new();
        let source = r#"<Screens>
<Component Name="Box"><Rectangle Name="r" Width="4" Height="4"/></Component>
<Group>
  <Ref RefName="Box"/>
  <Ref RefName="Box"/>
  <Set>r.Width = 9</Set>
</Group>
</Screens>"#;
        let (session, result) = build(&backend, &CompileConfig::default(), source);
        result.unwrap();

        let widths: Vec<i32> = session
            .tree
            .ids()
            .filter(|id| session.tree.get(*id).name() == Some("r"))
            .map(|id| session.tree.get(id).width())
            .collect();
        assert_eq!(widths, vec![4, 9, 9]);
    }

    #[test]
    fn test_ref_set_uses_short_clauses() {
        let backend = SoftwareRasterizer::new();
        let source = r#"<S><Group>
  <Rectangle Name="panel" Width="2" Height="2"/>
  <Set RefName="panel">Width = 5; Fill = Green</Set>
</Group></S>"#;
        let (session, result) = build(&backend, &CompileConfig::default(), source);
        result.unwrap();
        let panel = session
            .tree
            .ids()
            .find(|id| session.tree.get(*id).name() == Some("panel"))
            .unwrap();
        assert_eq!(session.tree.get(panel).width(), 5);
        assert_eq!(fill_of(&session, panel), Some(Color::rgb(0, 0x80, 0)));
    }

    #[test]
    fn test_column_copies_nearest_default() {
        let backend = SoftwareRasterizer::new();
        let source = r#"<S><Grid RowHeight="20" ColumnWidth="10">
  <Default><Rectangle Width="5" Height="5"/></Default>
  <Row><Column/><Column/></Row>
  <Row><Default><Ellipse Width="2" Height="2"/></Default><Column/></Row>
</Grid></S>"#;
        let (session, result) = build(&backend, &CompileConfig::default(), source);
        result.unwrap();

        let columns: Vec<&Element> = session
            .tree
            .ids()
            .map(|id| session.tree.get(id))
            .filter(|e| e.tag() == "Column")
            .collect();
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(|c| matches!(
            c.kind(),
            Some(GraphicKind::Default { is_copy: true })
        )));

        let child_tag = |column: &Element| session.tree.get(column.children[0]).tag().to_string();
        assert_eq!(child_tag(columns[0]), "Rectangle");
        assert_eq!(child_tag(columns[1]), "Rectangle");
        assert_eq!(child_tag(columns[2]), "Ellipse");
    }

    #[test]
    fn test_column_keeps_own_content() {
        let backend = SoftwareRasterizer::new();
        let source = r#"<S><Grid RowHeight="20" ColumnWidth="10">
  <Default><Rectangle Width="5" Height="5"/></Default>
  <Row><Column><Ellipse Width="2" Height="2"/></Column></Row>
</Grid></S>"#;
        let (session, result) = build(&backend, &CompileConfig::default(), source);
        result.unwrap();

        let column = session
            .tree
            .ids()
            .find(|id| session.tree.get(*id).tag() == "Column")
            .unwrap();
        assert!(matches!(
            session.tree.get(column).kind(),
            Some(GraphicKind::Column)
        ));
        let children = session.tree.children(column);
        assert_eq!(children.len(), 1);
        assert_eq!(session.tree.get(children[0]).tag(), "Ellipse");
    }

    #[test]
    fn test_unknown_component() {
        let backend = SoftwareRasterizer::new();
        let (_, result) = build(
            &backend,
            &CompileConfig::default(),
            r#"<S><Group><Ref RefName="Nope"/></Group></S>"#,
        );
        assert_eq!(
            result.unwrap_err().kind(),
            &ErrorKind::UnknownComponent("Nope".to_string())
        );
    }

    #[test]
    fn test_set_target_not_found() {
        let backend = SoftwareRasterizer::new();
        let (_, result) = build(
            &backend,
            &CompileConfig::default(),
            r#"<S><Group><SetString>label.Text = "x"</SetString></Group></S>"#,
        );
        assert_eq!(
            result.unwrap_err().kind(),
            &ErrorKind::SetTargetNotFound {
                keyword: "SetString",
                name: "label".to_string()
            }
        );
    }

    #[test]
    fn test_declarations_register() {
        let backend = SoftwareRasterizer::new();
        let (session, result) = build(
            &backend,
            &CompileConfig::default(),
            r#"<S>
<Color Name="Accent" Color="0xA02040" ColorDepth="Color8bpp"/>
<Font Name="Big" FontSize="24"/>
<Color Name="Accent" Color="Blue"/>
</S>"#,
        );
        result.unwrap();
        assert_eq!(session.registries.colors.len(), 1);
        assert_eq!(session.registries.colors["Accent"], Color::rgb(0, 0, 0xFF));
        assert_eq!(session.registries.fonts["Big"].size(), 24);

        let (_, result) = build(
            &backend,
            &CompileConfig::default(),
            r#"<S><Font FontSize="3"/></S>"#,
        );
        assert_eq!(
            result.unwrap_err().kind(),
            &ErrorKind::UnnamedDeclaration("Font")
        );
    }

    #[test]
    fn test_top_level_set_show_value_records_at_build() {
        let backend = SoftwareRasterizer::new();
        let (session, result) = build(
            &backend,
            &CompileConfig::default(),
            r#"<S><Set Name="Count" ShowValue="">4 + 1</Set><Set ShowValue="">Limit = 9</Set></S>"#,
        );
        result.unwrap();
        assert_eq!(
            session.values,
            vec![
                ShowValue::new("Count", ValueData::Int(5)),
                ShowValue::new("Limit", ValueData::Int(9)),
            ]
        );
        assert_eq!(session.registries.env.get("Count"), Some(&Value::Int(5)));
        assert_eq!(session.registries.env.get("Limit"), None);
    }

    #[test]
    fn test_set_show_value_records_per_drawn_instance() {
        let backend = SoftwareRasterizer::new();
        let (session, result) = build(
            &backend,
            &CompileConfig::default(),
            r#"<S>
<Component Name="Unused"><Set ShowValue="">u = 9</Set></Component>
<Component Name="Tick"><Set Name="t" ShowValue="">3</Set></Component>
<Canvas Name="c" Width="2" Height="2" ColorDepth="Color8bpp">
  <Set ShowValue="">k = 7</Set>
  <Ref RefName="Tick"/>
  <Ref RefName="Tick"/>
</Canvas>
</S>"#,
        );
        result.unwrap();
        let expected = vec![
            ShowValue::new("k", ValueData::Int(7)),
            ShowValue::new("t", ValueData::Int(3)),
            ShowValue::new("t", ValueData::Int(3)),
        ];
        assert_eq!(session.values, expected);
        assert_eq!(session.images[0].values(), expected.as_slice());
    }

    #[test]
    fn test_named_text_is_measured() {
        let backend = SoftwareRasterizer::new();
        let (session, result) = build(
            &backend,
            &CompileConfig::default(),
            r#"<S><Group><TextBlock Name="Title" Height="30">Hello</TextBlock></Group></S>"#,
        );
        result.unwrap();
        let Some(Value::Size { width, height }) = session.registries.env.get("Title") else {
            panic!("expected a measured size");
        };
        assert!(*width > 0);
        assert_eq!(*height, 30);
    }

    #[test]
    fn test_root_multiples() {
        let backend = SoftwareRasterizer::new();
        let (session, result) = build(
            &backend,
            &CompileConfig::default(),
            r#"<S StrideMultiple="4" WidthMultiple="2" Title="ignored"/>"#,
        );
        result.unwrap();
        assert_eq!(session.settings.stride_multiple, 4);
        assert_eq!(session.settings.width_multiple, 2);

        let (_, result) = build(&backend, &CompileConfig::default(), r#"<S WidthMultiple="3"/>"#);
        assert!(matches!(
            result.unwrap_err().kind(),
            ErrorKind::InvalidMultiple { .. }
        ));
    }
}
