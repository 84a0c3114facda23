//! Monitor topology: which rectangles the logos bounce in.
//!
//! A [`TopologyProvider`] returns one [`Region`] per physical monitor in the
//! shared virtual-desktop coordinate space. The window covering the desktop
//! is placed at the virtual origin, so [`to_surface_space`] shifts regions
//! into window-relative coordinates before the session sees them.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A monitor rectangle. Monitors never overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Same rectangle moved by `(-dx, -dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x - dx, self.y - dy, self.width, self.height)
    }

    /// Smallest rectangle containing every region, or `None` for an empty list.
    pub fn bounding(regions: &[Region]) -> Option<Region> {
        let first = regions.first()?;
        let (mut left, mut top) = (first.x as i64, first.y as i64);
        let (mut right, mut bottom) = (first.right(), first.bottom());
        for r in &regions[1..] {
            left = left.min(r.x as i64);
            top = top.min(r.y as i64);
            right = right.max(r.right());
            bottom = bottom.max(r.bottom());
        }
        Some(Region::new(
            left as i32,
            top as i32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}x{}", self.x, self.y, self.width, self.height)
    }
}

/// Parses `x,y,WxH` or a bare `WxH` (origin at 0,0).
impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidRegion(s.to_string());
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();

        let (x, y, size) = match parts.as_slice() {
            [size] => (0, 0, *size),
            [x, y, size] => (
                x.parse().map_err(|_| invalid())?,
                y.parse().map_err(|_| invalid())?,
                *size,
            ),
            _ => return Err(invalid()),
        };

        let (width, height) = parse_size(size).map_err(|_| invalid())?;
        Ok(Region::new(x, y, width, height))
    }
}

/// Parse `WxH` into a non-zero size.
pub fn parse_size(s: &str) -> Result<(u32, u32)> {
    let invalid = || Error::InvalidSize(s.to_string());
    let (w, h) = s
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let width: u32 = w.trim().parse().map_err(|_| invalid())?;
    let height: u32 = h.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

// ── Providers ──────────────────────────────────────────────────────

/// Source of monitor rectangles.
pub trait TopologyProvider {
    /// One region per monitor, in virtual-desktop coordinates.
    fn regions(&self) -> Result<Vec<Region>>;

    /// Width of the primary monitor, used to size the logo.
    fn primary_width(&self) -> Result<u32> {
        self.regions()?
            .first()
            .map(|r| r.width)
            .ok_or(Error::NoMonitors)
    }

    /// Bounding box of every monitor: where the window goes.
    fn virtual_bounds(&self) -> Result<Region> {
        Region::bounding(&self.regions()?).ok_or(Error::NoMonitors)
    }
}

/// A topology given up front, from the command line or a test.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedTopology {
    regions: Vec<Region>,
}

impl FixedTopology {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// A single monitor of the given size at the origin.
    pub fn single(width: u32, height: u32) -> Self {
        Self::new(vec![Region::new(0, 0, width, height)])
    }
}

impl TopologyProvider for FixedTopology {
    fn regions(&self) -> Result<Vec<Region>> {
        if self.regions.is_empty() {
            return Err(Error::NoMonitors);
        }
        Ok(self.regions.clone())
    }
}

/// Shift `regions` so `bounds`' top-left corner becomes (0, 0).
pub fn to_surface_space(regions: &[Region], bounds: Region) -> Vec<Region> {
    regions
        .iter()
        .map(|r| r.translated(bounds.x, bounds.y))
        .collect()
}

/// The platform's own provider, when this build has one.
#[cfg(target_os = "windows")]
pub fn detect() -> Result<Box<dyn TopologyProvider>> {
    win32::enable_dpi_awareness();
    Ok(Box::new(win32::Win32Topology))
}

/// The platform's own provider, when this build has one.
#[cfg(all(target_os = "linux", feature = "x11"))]
pub fn detect() -> Result<Box<dyn TopologyProvider>> {
    Ok(Box::new(xorg::X11Topology))
}

/// The platform's own provider, when this build has one.
#[cfg(not(any(target_os = "windows", all(target_os = "linux", feature = "x11"))))]
pub fn detect() -> Result<Box<dyn TopologyProvider>> {
    Err(Error::Platform(
        "no monitor enumeration available on this platform".into(),
    ))
}

// ── Windows ────────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
mod win32 {
    use super::{Region, TopologyProvider};
    use crate::error::{Error, Result};
    use std::mem::size_of;
    use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
    use windows::Win32::Graphics::Gdi::{
        EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO,
    };
    use windows::Win32::UI::HiDpi::{PROCESS_PER_MONITOR_DPI_AWARE, SetProcessDpiAwareness};
    use windows::Win32::UI::WindowsAndMessaging::{MONITORINFOF_PRIMARY, SetProcessDPIAware};

    /// Ask for real pixel sizes instead of DPI-virtualized ones.
    pub fn enable_dpi_awareness() {
        let per_monitor = unsafe { SetProcessDpiAwareness(PROCESS_PER_MONITOR_DPI_AWARE) };
        if per_monitor.is_err() {
            // Pre-8.1 systems only know the system-wide flag.
            let _ = unsafe { SetProcessDPIAware() };
        }
    }

    pub struct Win32Topology;

    struct Monitor {
        region: Region,
        primary: bool,
    }

    impl TopologyProvider for Win32Topology {
        fn regions(&self) -> Result<Vec<Region>> {
            // Primary first, then enumeration order.
            let mut monitors = enumerate()?;
            monitors.sort_by_key(|m| !m.primary);
            Ok(monitors.into_iter().map(|m| m.region).collect())
        }
    }

    fn enumerate() -> Result<Vec<Monitor>> {
        let mut monitors: Vec<Monitor> = Vec::new();

        let ok = unsafe {
            EnumDisplayMonitors(
                Some(HDC(std::ptr::null_mut())),
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut monitors as *mut _ as isize),
            )
        };

        if ok.as_bool() && !monitors.is_empty() {
            Ok(monitors)
        } else {
            Err(Error::Platform("EnumDisplayMonitors failed".into()))
        }
    }

    unsafe extern "system" fn monitor_enum_proc(
        hmonitor: HMONITOR,
        _hdc: HDC,
        _lprc: *mut RECT,
        lparam: LPARAM,
    ) -> BOOL {
        let monitors = unsafe { &mut *(lparam.0 as *mut Vec<Monitor>) };

        let mut info = MONITORINFO {
            cbSize: size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        if unsafe { GetMonitorInfoW(hmonitor, &mut info) }.as_bool() {
            let rect = info.rcMonitor;
            monitors.push(Monitor {
                region: Region::new(
                    rect.left,
                    rect.top,
                    (rect.right - rect.left) as u32,
                    (rect.bottom - rect.top) as u32,
                ),
                primary: (info.dwFlags & MONITORINFOF_PRIMARY) != 0,
            });
        }
        BOOL(1)
    }
}

// ── X11 ────────────────────────────────────────────────────────────

#[cfg(all(target_os = "linux", feature = "x11"))]
mod xorg {
    use super::{Region, TopologyProvider};
    use crate::error::{Error, Result};
    use std::ptr::null;
    use x11::xlib;

    /// The default X screen as a single monitor.
    pub struct X11Topology;

    impl TopologyProvider for X11Topology {
        fn regions(&self) -> Result<Vec<Region>> {
            unsafe {
                let display = xlib::XOpenDisplay(null());
                if display.is_null() {
                    return Err(Error::Platform("XOpenDisplay failed".into()));
                }
                let screen = xlib::XDefaultScreen(display);
                let width = xlib::XDisplayWidth(display, screen);
                let height = xlib::XDisplayHeight(display, screen);
                xlib::XCloseDisplay(display);

                if width <= 0 || height <= 0 {
                    return Err(Error::NoMonitors);
                }
                Ok(vec![Region::new(0, 0, width as u32, height as u32)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("1920x1080", Region::new(0, 0, 1920, 1080))]
    #[case("-1920,0,1920x1080", Region::new(-1920, 0, 1920, 1080))]
    #[case(" 10 , 20 , 30X40 ", Region::new(10, 20, 30, 40))]
    fn parse_region(#[case] input: &str, #[case] expected: Region) {
        assert_eq!(input.parse::<Region>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("1920")]
    #[case("0x1080")]
    #[case("1,2x3")]
    #[case("a,b,10x10")]
    #[case("1,2,3,4x5")]
    fn parse_region_rejects(#[case] input: &str) {
        let err = input.parse::<Region>().unwrap_err();
        assert!(matches!(err, Error::InvalidRegion(s) if s == input));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let region = Region::new(-1280, 200, 1280, 1024);
        assert_eq!(region.to_string(), "-1280,200,1280x1024");
        assert_eq!(region.to_string().parse::<Region>().unwrap(), region);
    }

    #[test]
    fn parse_size_rejects_garbage() {
        assert!(matches!(parse_size("big"), Err(Error::InvalidSize(_))));
        assert_eq!(parse_size("800x600").unwrap(), (800, 600));
    }

    #[test]
    fn bounding_spans_side_by_side_monitors() {
        let regions = [
            Region::new(0, 0, 1920, 1080),
            Region::new(-1280, 56, 1280, 1024),
            Region::new(1920, -200, 1080, 1920),
        ];
        assert_eq!(
            Region::bounding(&regions),
            Some(Region::new(-1280, -200, 4280, 1920))
        );
    }

    #[test]
    fn bounding_of_nothing_is_none() {
        assert_eq!(Region::bounding(&[]), None);
    }

    #[test]
    fn surface_space_moves_origin() {
        let regions = vec![Region::new(0, 0, 1920, 1080), Region::new(-1280, 56, 1280, 1024)];
        let bounds = Region::bounding(&regions).unwrap();

        assert_eq!(
            to_surface_space(&regions, bounds),
            vec![Region::new(1280, 0, 1920, 1080), Region::new(0, 56, 1280, 1024)]
        );
    }

    #[test]
    fn fixed_topology_reports_primary_and_bounds() {
        let topo = FixedTopology::new(vec![
            Region::new(0, 0, 2560, 1440),
            Region::new(2560, 0, 1920, 1080),
        ]);
        assert_eq!(topo.primary_width().unwrap(), 2560);
        assert_eq!(topo.virtual_bounds().unwrap(), Region::new(0, 0, 4480, 1440));
    }

    #[test]
    fn empty_topology_is_an_error() {
        let topo = FixedTopology::new(Vec::new());
        assert!(matches!(topo.regions(), Err(Error::NoMonitors)));
        assert!(matches!(topo.virtual_bounds(), Err(Error::NoMonitors)));
    }

    #[test]
    fn single_topology_is_one_full_screen() {
        assert_eq!(
            FixedTopology::single(800, 600).regions().unwrap(),
            vec![Region::new(0, 0, 800, 600)]
        );
    }
}
