//! End-to-end run of a clocked flipflop under a test bench.

use std::cell::RefCell;
use std::rc::Rc;

use hdl_logic::Logic;
use hdl_sim::{Condition, Design, Frame, Sim, SignalKind, SimError, Step, Value, Wait};

/// Input settings applied before each clock toggle: `(rst, en, d)`.
const SETTINGS: [(Option<u8>, Option<u8>, Option<u8>); 6] = [
    (Some(1), Some(0), Some(0)),
    (Some(0), None, None),
    (None, Some(1), Some(1)),
    (None, Some(0), Some(0)),
    (None, Some(1), Some(0)),
    (None, Some(0), Some(1)),
];

/// Expected `(o, no)` after each toggle settles.
const EXPECTED: [(u8, u8); 6] = [(0, 1), (0, 1), (1, 0), (1, 0), (0, 1), (0, 1)];

#[test]
fn flipflop_scenario() {
    let mut design = Design::new();

    let flipflop = design
        .part("flipflop")
        .signal("clk", SignalKind::Logic)
        .signal("rst", SignalKind::Logic)
        .signal("en", SignalKind::Logic)
        .signal("d", SignalKind::Logic)
        .signal("o", SignalKind::Logic)
        .signal("no", SignalKind::Logic)
        .when(
            "process",
            Condition::new().rising(["rst", "clk"]),
            |f: &mut Frame<'_>| -> Result<Step, SimError> {
                if f.logic("rst")?.is_one() {
                    f.set("o", 0)?;
                } else if f.logic("clk")?.is_one() && f.logic("en")?.is_one() {
                    let d = f.logic("d")?;
                    f.set("o", d)?;
                }
                Ok(Step::Done)
            },
        )
        .always(
            "neg",
            |f: &mut Frame<'_>| -> Result<Step, SimError> {
                let o = f.logic("o")?;
                f.set("no", !o)?;
                Ok(Step::Done)
            },
        )
        .build()
        .unwrap();

    let observed: Rc<RefCell<Vec<(Logic, Logic)>>> = Rc::new(RefCell::new(Vec::new()));
    let recorder = Rc::clone(&observed);

    let mut phase = 0usize;
    let testbench = design
        .part("testbench")
        .child("ff", flipflop)
        .once(
            "drive",
            move |f: &mut Frame<'_>| -> Result<Step, SimError> {
                let pause = Wait::delay("200 ns".parse::<hdl_logic::Timestamp>()?);

                // One phase per suspension: settle the clock low, then per
                // test vector apply the settings, toggle the clock and let
                // 200 ns pass before sampling the outputs.
                let step = match phase {
                    0 => {
                        f.child("ff")?.set("clk", 0)?;
                        Step::Wait(pause)
                    }
                    n if n <= SETTINGS.len() => {
                        if n > 1 {
                            sample(f, &recorder)?;
                        }

                        let (rst, en, d) = SETTINGS[n - 1];
                        let mut ff = f.child("ff")?;
                        if let Some(rst) = rst {
                            ff.set("rst", rst)?;
                        }
                        if let Some(en) = en {
                            ff.set("en", en)?;
                        }
                        if let Some(d) = d {
                            ff.set("d", d)?;
                        }

                        let clk = ff.logic("clk")?;
                        ff.set("clk", !clk)?;
                        Step::Wait(pause)
                    }
                    _ => {
                        sample(f, &recorder)?;
                        Step::Done
                    }
                };

                phase += 1;
                Ok(step)
            },
        )
        .build()
        .unwrap();

    let root = design.instantiate(testbench).unwrap();
    let mut sim = Sim::new(design, root).unwrap();
    sim.run().unwrap();

    let expected: Vec<(Logic, Logic)> = EXPECTED
        .iter()
        .map(|(o, no)| {
            (
                Logic::try_from(*o).unwrap(),
                Logic::try_from(*no).unwrap(),
            )
        })
        .collect();
    assert_eq!(*observed.borrow(), expected);

    // Six toggles from low leave the clock low again; if it is not, the
    // test bench never actually ran.
    let ff = sim.design().child(root, "ff").unwrap();
    assert_eq!(sim.get(ff, "clk").unwrap(), &Value::Logic(Logic::Zero));
    assert_eq!(sim.now(), "1400 ns".parse().unwrap());
}

fn sample(
    f: &mut Frame<'_>,
    recorder: &Rc<RefCell<Vec<(Logic, Logic)>>>,
) -> Result<(), SimError> {
    let mut ff = f.child("ff")?;
    let o = ff.logic("o")?;
    let no = ff.logic("no")?;
    recorder.borrow_mut().push((o, no));
    Ok(())
}
