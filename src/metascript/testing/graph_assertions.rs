//! Token graph checks

use crate::metascript::token::{TokenGraph, TokenId, TokenKind};

/// Panics unless every token's significant links point at the nearest significant token
/// strictly after and before it in full order, and the full order is doubly linked.
pub fn assert_links_consistent(graph: &TokenGraph) {
    let order: Vec<TokenId> = graph.iter().map(|(id, _)| id).collect();
    assert_eq!(
        order.len(),
        graph.len(),
        "full order reaches {} of {} tokens",
        order.len(),
        graph.len()
    );

    for (index, &id) in order.iter().enumerate() {
        let expected_prev = index.checked_sub(1).map(|i| order[i]);
        assert_eq!(graph.prev(id), expected_prev, "prev of token #{}", id.index());

        let expected_next = order[index + 1..]
            .iter()
            .copied()
            .find(|&other| graph[other].is_significant());
        assert_eq!(
            graph.next_significant(id),
            expected_next,
            "next significant of {} (token #{})",
            graph[id],
            id.index()
        );

        let expected_prev_significant = order[..index]
            .iter()
            .rev()
            .copied()
            .find(|&other| graph[other].is_significant());
        assert_eq!(
            graph.prev_significant(id),
            expected_prev_significant,
            "prev significant of {} (token #{})",
            graph[id],
            id.index()
        );
    }
}

/// Texts of the significant tokens between the markers; virtual semicolons show as `;`.
pub fn significant_texts(graph: &TokenGraph) -> Vec<String> {
    graph
        .significant()
        .filter(|(_, token)| !matches!(token.kind, TokenKind::Start | TokenKind::End))
        .map(|(_, token)| token.text.clone())
        .collect()
}

pub fn virtual_semicolon_count(graph: &TokenGraph) -> usize {
    graph
        .iter()
        .filter(|(_, token)| token.kind == TokenKind::VirtualSemicolon)
        .count()
}
