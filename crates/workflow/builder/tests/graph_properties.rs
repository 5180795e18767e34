//! Property tests: any chain of steps wired through the builder finalizes into a complete graph.

use proptest::prelude::*;
use workflow_builder::{TaskOptions, WorkflowBuilder};
use workflow_types::{Edge, Operator, Output};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_operator() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Generation),
        Just(Operator::FunctionCalling),
        Just(Operator::FunctionCallingRaw),
        Just(Operator::Sample),
    ]
}

/// Build a chain of `operators.len()` steps, each linked to its successor.
/// A set `loop_back[i]` adds an edge from step i + 1 back to step i. The last
/// step either goes to the terminal or loops back to the first step.
fn build_chain(operators: &[Operator], loop_back: &[bool], close_last: bool) -> WorkflowBuilder {
    let mut builder = WorkflowBuilder::new();
    for (i, operator) in operators.iter().enumerate() {
        let prompt = if i == 0 {
            "start".to_string()
        } else {
            format!("continue from {{{{out_{}}}}}", i - 1)
        };
        builder
            .generative_step(
                prompt,
                *operator,
                TaskOptions::new().with_output(Output::write(format!("out_{}", i))),
            )
            .unwrap();
    }

    let last = operators.len() - 1;
    let mut edges = Vec::new();
    for i in 0..last {
        edges.push(Edge::new(i.to_string(), (i + 1).to_string()));
        if loop_back.get(i).copied().unwrap_or(false) {
            edges.push(Edge::new((i + 1).to_string(), i.to_string()));
        }
    }
    if close_last {
        edges.push(Edge::to_end(last.to_string()));
    } else {
        edges.push(Edge::new(last.to_string(), "0"));
    }
    builder.flow(edges).unwrap();
    builder
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Every non-terminal task is an edge source and every edge target resolves.
    #[test]
    fn finalized_graph_has_no_dangling_tasks_or_invalid_targets(
        operators in proptest::collection::vec(arb_operator(), 1..12),
        loop_back in proptest::collection::vec(any::<bool>(), 0..12),
        close_last in any::<bool>(),
    ) {
        let workflow = build_chain(&operators, &loop_back, close_last).build().unwrap();

        prop_assert_eq!(workflow.tasks.len(), operators.len() + 1);
        prop_assert_eq!(workflow.tasks.iter().filter(|t| t.is_terminal()).count(), 1);
        prop_assert!(workflow.tasks.last().unwrap().is_terminal());

        for task in workflow.tasks.iter().filter(|t| !t.is_terminal()) {
            prop_assert!(workflow.steps.iter().any(|e| e.source == task.id));
        }
        for edge in &workflow.steps {
            prop_assert!(edge.target.is_terminal() || workflow.has_task(&edge.target));
        }
    }

    /// The last task reaches the terminal through exactly one edge.
    #[test]
    fn last_task_has_exactly_one_terminal_edge(
        operators in proptest::collection::vec(arb_operator(), 1..12),
        close_last in any::<bool>(),
    ) {
        let workflow = build_chain(&operators, &[], close_last).build().unwrap();
        let last = (operators.len() - 1).to_string();

        let terminal_edges = workflow
            .steps
            .iter()
            .filter(|e| e.source == last.as_str() && e.is_terminal())
            .count();
        prop_assert_eq!(terminal_edges, 1);
    }

    /// Every finalized workflow with a return value passes the structural validator.
    #[test]
    fn finalized_workflow_passes_schema(
        operators in proptest::collection::vec(arb_operator(), 1..8),
        close_last in any::<bool>(),
    ) {
        let mut builder = build_chain(&operators, &[], close_last);
        builder.set_return_value(&format!("out_{}", operators.len() - 1)).unwrap();
        let workflow = builder.build().unwrap();
        prop_assert!(workflow_schema::validate_definition(&workflow).is_ok());
    }
}
