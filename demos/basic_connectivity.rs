//! Basic connectivity example: build a small forest, rewire it, and watch
//! the component partition change.

use tourtree::DynamicForest;

fn main() -> anyhow::Result<()> {
    // Two trees (0-1-2 and 3-4) plus the isolated vertex 5.
    let mut forest = DynamicForest::from_edges(6, &[(0, 1), (1, 2), (3, 4)])?;
    println!(
        "start: {} vertices, {} edges, {} components",
        forest.vertex_count(),
        forest.edge_count(),
        forest.component_count()
    );
    print_tour(&mut forest, 0)?;

    // Bridge the two trees, then absorb the stray vertex.
    forest.link(2, 3)?;
    forest.link(4, 5)?;
    println!(
        "after linking 2-3 and 4-5: {} components",
        forest.component_count()
    );
    println!("0 and 5 connected? {}", forest.connected(0, 5)?);
    print_tour(&mut forest, 0)?;

    // Cutting the bridge splits the component back apart.
    forest.cut(2, 3)?;
    println!("after cutting 2-3: {} components", forest.component_count());
    println!("0 and 5 connected? {}", forest.connected(0, 5)?);
    println!("3 and 5 connected? {}", forest.connected(3, 5)?);

    // A link that would close a cycle is refused.
    if let Err(err) = forest.link(0, 2) {
        println!("link 0-2 refused: {err}");
    }

    Ok(())
}

/// Print the Euler tour of `v`'s component in its current rotation.
fn print_tour(forest: &mut DynamicForest, v: tourtree::Vertex) -> anyhow::Result<()> {
    let tour = forest
        .component_tokens(v)?
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    println!("tour of {v}'s component: {tour}");
    Ok(())
}
