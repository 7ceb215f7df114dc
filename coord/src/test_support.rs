//! Shared fakes for the crate's unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::clock::ManualClock;
use crate::config::CoordConfig;
use crate::coordinator::Coordinator;
use crate::history::AddressBar;
use crate::overlay::{OverlayHost, SwapRequest};

pub const BOARD_URL: &str = "https://board.test/boards/1/";
pub const BODY: &str = "card-modal-body";

/// In-memory address bar recording history writes.
#[derive(Default)]
pub struct FakeBar {
    pub href: RefCell<String>,
    pub pushes: RefCell<Vec<String>>,
    pub replaces: RefCell<Vec<String>>,
}

impl FakeBar {
    pub fn at(href: &str) -> Rc<Self> {
        Rc::new(Self { href: RefCell::new(href.to_owned()), ..Default::default() })
    }

    pub fn navigate(&self, href: &str) {
        *self.href.borrow_mut() = href.to_owned();
    }
}

impl AddressBar for FakeBar {
    fn href(&self) -> String {
        self.href.borrow().clone()
    }

    fn push(&self, url: &str) {
        self.pushes.borrow_mut().push(url.to_owned());
        *self.href.borrow_mut() = url.to_owned();
    }

    fn replace(&self, url: &str) {
        self.replaces.borrow_mut().push(url.to_owned());
        *self.href.borrow_mut() = url.to_owned();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Show,
    Hide,
    Clear,
    Swap(SwapRequest),
    Init(String),
}

#[derive(Default)]
pub struct RecordingHost {
    pub calls: RefCell<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn take(&self) -> Vec<HostCall> {
        self.calls.borrow_mut().drain(..).collect()
    }
}

impl OverlayHost for RecordingHost {
    fn show(&self) {
        self.calls.borrow_mut().push(HostCall::Show);
    }

    fn hide(&self) {
        self.calls.borrow_mut().push(HostCall::Hide);
    }

    fn clear_content(&self) {
        self.calls.borrow_mut().push(HostCall::Clear);
    }

    fn request_swap(&self, request: &SwapRequest) {
        self.calls.borrow_mut().push(HostCall::Swap(request.clone()));
    }

    fn init_widgets(&self, region: &str) {
        self.calls.borrow_mut().push(HostCall::Init(region.to_owned()));
    }
}

/// A coordinator wired to fakes, with handles to each fake.
pub struct Harness {
    pub clock: Rc<ManualClock>,
    pub bar: Rc<FakeBar>,
    pub host: Rc<RecordingHost>,
    pub coord: Coordinator,
}

impl Harness {
    pub fn at(href: &str) -> Self {
        let clock = Rc::new(ManualClock::new(50_000.0));
        let bar = FakeBar::at(href);
        let host = Rc::new(RecordingHost::default());
        let coord = Coordinator::init(CoordConfig::default(), clock.clone(), bar.clone(), host.clone());
        Self { clock, bar, host, coord }
    }

    pub fn new() -> Self {
        Self::at(BOARD_URL)
    }

    /// Open card `id` and deliver its swap notification.
    pub fn open(&self, id: crate::EntityId) {
        self.coord.overlay().open_card(id, crate::history::HistoryMode::Push);
        self.coord.overlay().on_content_swapped(BODY);
        self.host.take();
    }
}
