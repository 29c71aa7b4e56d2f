//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use wrapgrid::prelude::*;

/// Everything the recording containers report back.
#[derive(Debug, Default)]
pub struct Log {
    pub built: usize,
    pub destroyed: usize,
    pub recycled: usize,
    /// Live containers by id, with the item they are bound to.
    pub live: HashMap<u64, Option<ItemKey>>,
    /// Last rectangle handed to each container.
    pub arranged: HashMap<u64, Rect>,
    next_id: u64,
}

pub type SharedLog = Arc<Mutex<Log>>;

pub struct Cell {
    id: u64,
    size: Size,
    /// Bands run along this orientation and the cell fills their cross axis.
    fill: Option<Orientation>,
    log: SharedLog,
}

impl Container for Cell {
    fn measure(&mut self, available: Size) -> Size {
        match self.fill {
            Some(Orientation::Vertical) => Size::new(available.width, self.size.height),
            Some(Orientation::Horizontal) => Size::new(self.size.width, available.height),
            None => self.size,
        }
    }

    fn arrange(&mut self, rect: Rect) {
        self.log.lock().arranged.insert(self.id, rect);
    }

    fn bind(&mut self, item: ItemKey, _index: usize) {
        self.log.lock().live.insert(self.id, Some(item));
    }

    fn unbind(&mut self) {
        self.log.lock().live.insert(self.id, None);
    }
}

/// Template building [`Cell`]s of a fixed size.
pub struct RecordingTemplate {
    pub log: SharedLog,
    size: Size,
    fill: Option<Orientation>,
    fail_on: Option<ItemKey>,
}

impl RecordingTemplate {
    pub fn new(size: Size) -> Self {
        Self {
            log: Arc::new(Mutex::new(Log::default())),
            size,
            fill: None,
            fail_on: None,
        }
    }

    /// Containers that take the whole available width, like a detail panel.
    pub fn detail(height: f32) -> Self {
        Self {
            fill: Some(Orientation::Vertical),
            ..Self::new(Size::new(0.0, height))
        }
    }

    /// Detail panel for horizontal bands: fixed width, full height.
    pub fn column_detail(width: f32) -> Self {
        Self {
            fill: Some(Orientation::Horizontal),
            ..Self::new(Size::new(width, 0.0))
        }
    }

    pub fn failing_on(mut self, item: ItemKey) -> Self {
        self.fail_on = Some(item);
        self
    }
}

impl ItemTemplate for RecordingTemplate {
    fn build(&mut self, item: ItemKey) -> Result<Box<dyn Container>, TemplateError> {
        if self.fail_on == Some(item) {
            return Err(TemplateError::build(item, "broken template"));
        }
        let mut log = self.log.lock();
        log.built += 1;
        log.next_id += 1;
        let id = log.next_id;
        log.live.insert(id, None);
        Ok(Box::new(Cell {
            id,
            size: self.size,
            fill: self.fill,
            log: self.log.clone(),
        }))
    }

    fn recycle(&mut self, container: &mut dyn Container) {
        self.log.lock().recycled += 1;
        container.unbind();
    }

    fn destroy(&mut self, container: Box<dyn Container>) {
        drop(container);
        self.log.lock().destroyed += 1;
    }
}

/// A panel over `count` items of `item` size, with the given detail height.
pub struct Fixture {
    pub panel: WrapPanel,
    pub source: Arc<VecSource<usize>>,
    pub items: SharedLog,
    pub details: SharedLog,
}

impl Fixture {
    pub fn new(count: usize, item: Size, detail_height: f32, config: PanelConfig) -> Self {
        Self::with_details(count, item, RecordingTemplate::detail(detail_height), config)
    }

    pub fn with_details(
        count: usize,
        item: Size,
        details: RecordingTemplate,
        config: PanelConfig,
    ) -> Self {
        let source = Arc::new(VecSource::new((0..count).collect()));
        let items = RecordingTemplate::new(item);
        let (items_log, details_log) = (items.log.clone(), details.log.clone());

        let mut panel = WrapPanel::new(config.with_item_size(ItemSize::Fixed(item)));
        panel.set_item_template(items);
        panel.set_expansion_template(details);
        panel.set_source(source.clone());

        Self {
            panel,
            source,
            items: items_log,
            details: details_log,
        }
    }

    /// Packed 100x100 items, so bands are easy to reason about.
    pub fn grid(count: usize, detail_height: f32) -> Self {
        Self::new(
            count,
            Size::new(100.0, 100.0),
            detail_height,
            PanelConfig::new().with_spacing_mode(SpacingMode::None),
        )
    }

    /// Packed 100x100 items in columns, with a detail panel `detail_width`
    /// wide.
    pub fn columns(count: usize, detail_width: f32) -> Self {
        Self::with_details(
            count,
            Size::new(100.0, 100.0),
            RecordingTemplate::column_detail(detail_width),
            PanelConfig::new()
                .with_spacing_mode(SpacingMode::None)
                .with_orientation(Orientation::Horizontal),
        )
    }

    pub fn layout(&mut self, viewport: Size) {
        self.panel.measure(viewport).unwrap();
        self.panel.arrange(viewport);
    }

    pub fn key(&self, index: usize) -> ItemKey {
        self.source.key_at(index).unwrap()
    }

    pub fn expand(&mut self, index: usize) {
        let key = self.key(index);
        self.panel.set_expanded_item(Some(key));
    }

    /// Layout rectangle of the realized item at `index`.
    pub fn item_rect(&self, index: usize) -> Option<Rect> {
        self.panel.children().into_iter().find_map(|child| match child {
            ChildSlot::Item { index: i, rect, .. } if i == index => Some(rect),
            _ => None,
        })
    }

    pub fn expansion_rect(&self) -> Option<Rect> {
        self.panel.children().into_iter().find_map(|child| match child {
            ChildSlot::Expansion { rect, .. } => Some(rect),
            ChildSlot::Item { .. } => None,
        })
    }
}
