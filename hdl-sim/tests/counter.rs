//! Edge counters driven by a once-block clock generator.

use hdl_logic::{Logvec, Span, Timestamp, Unsigned};
use hdl_sim::{Condition, Design, Frame, Sim, SignalKind, SimError, Step, Value, Wait};

const TOGGLES: usize = 10;

#[test]
fn edge_counters() {
    let byte = Span::new(7, 0).unwrap();
    let mut design = Design::new();

    let counter = design
        .part("counter")
        .signal("clk", SignalKind::Logic)
        .signal_with("rises", SignalKind::Unsigned(byte), 0)
        .signal_with("falls", SignalKind::Unsigned(byte), 0)
        .when(
            "count_rises",
            Condition::new().rising(["clk"]),
            |f: &mut Frame<'_>| -> Result<Step, SimError> {
                let rises = f.unsigned("rises")?;
                f.set("rises", rises + Logvec::<Unsigned>::from(1u8))?;
                Ok(Step::Done)
            },
        )
        .when(
            "count_falls",
            Condition::new().falling(["clk"]),
            |f: &mut Frame<'_>| -> Result<Step, SimError> {
                let falls = f.unsigned("falls")?;
                f.set("falls", falls + Logvec::<Unsigned>::from(1u8))?;
                Ok(Step::Done)
            },
        )
        .build()
        .unwrap();

    let mut toggles = 0usize;
    let driver = design
        .part("driver")
        .child("dut", counter)
        .once(
            "clock",
            move |f: &mut Frame<'_>| -> Result<Step, SimError> {
                if toggles == TOGGLES {
                    return Ok(Step::Done);
                }

                let mut dut = f.child("dut")?;
                let clk = dut.logic("clk")?;
                dut.set("clk", !clk)?;
                toggles += 1;
                Ok(Step::Wait(Wait::delay(Timestamp::from_ps(100_000))))
            },
        )
        .build()
        .unwrap();

    let root = design.instantiate(driver).unwrap();
    let mut sim = Sim::new(design, root).unwrap();
    sim.run().unwrap();

    let dut = sim.design().child(root, "dut").unwrap();
    let expected = Logvec::from_int(byte, TOGGLES as i128 / 2).unwrap();
    assert_eq!(sim.get(dut, "rises").unwrap(), &Value::Unsigned(expected.clone()));
    assert_eq!(sim.get(dut, "falls").unwrap(), &Value::Unsigned(expected));
    assert_eq!(sim.now(), "1 us".parse().unwrap());
}
