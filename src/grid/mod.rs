// Time grid: layout, painting model and pointer interaction for the
// Monday to Saturday clinic week

pub mod clock;
pub mod day_column;
pub mod handles;
pub mod intent;
pub mod interaction;
pub mod now_indicator;
pub mod packing;
pub mod render;
pub mod style;
pub mod time_axis;
pub mod week;

pub use clock::{Clock, FixedClock, SystemClock};
pub use day_column::{BlockLayout, DayColumnLayout, RenderDiagnostic};
pub use handles::HitTarget;
pub use intent::{GridIntent, IntentSink};
pub use interaction::{GesturePreview, GestureMode, GridInteractionController, InteractionState};
pub use now_indicator::{LiveTimeIndicator, NowTicker};
pub use packing::{ColumnAssignment, DayPacking, IntervalPacker};
pub use render::{VisualModel, WeekRenderer};
pub use style::{GridTheme, StatusPalette};
pub use time_axis::{AxisError, TimeAxis};
pub use week::{WeekNavigator, VISIBLE_DAYS};
