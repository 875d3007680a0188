//! C++ usage snippets shown on the documentation pages.

pub const INIT: &str = r#"#include <matrixpp/matrix.h>

namespace mpp = matrixpp; // More convenient namespace alias

int main()
{
    auto m = mpp::matrix<int>{};

    return 0;
}"#;

pub const KINDS: &str = r#"#include <matrixpp/matrix.h>

namespace mpp = matrixpp;

int main()
{
    auto m_fully_static = mpp::matrix<int, 3, 3>{};
    auto m_fully_dynamic = mpp::matrix<int, std::dynamic_extent, std::dynamic_extent>{};
    // ^ or just mpp::matrix<int>{} since the size parameters are defaulted to dynamic extent
    auto m_dynamic_rows = mpp::matrix<int, std::dynamic_extent, 3>{};
    auto m_dynamic_columns = mpp::matrix<int, 3, std::dynamic_extent>{};
    // ^ or just mpp::matrix<int, 3>{} since the column parameter is defaulted to dynamic extent

    return 0;
}"#;

pub const OPERATIONS: &str = r#"#include <matrixpp/matrix.h>
#include <matrixpp/operations.hpp> // Required for +, -, *, and /
#include <matrixpp/algorithms.hpp> // Required for determinant, inverse, transpose, block, and etc...

namespace mpp = matrixpp;

int main()
{
    auto m = mpp::matrix{{
        { 1, 2, 3 },
        { 1, 2, 3 },
        { 1, 2, 3 }
    }}; // Uses 2D initializer list initializer. Defaults to dynamic matrix

    // Math operations are expression templates, so the results are not evaluated immediately
    auto expr = m + m - m * 2 + m / 3;

    auto result = expr(0, 0); // Only evaluates the result at (0, 0)
    auto result_m = mpp::matrix{ expr }; // Evaluates the whole expression and constructs a matrix

    auto m_det = mpp::determinant(m);
    auto m_inv = mpp::inverse<float>(m); // Optional template parameter for the result precision
    auto m_transposed = mpp::transpose(m);
    auto m_block = mpp::block(m, 0, 0, 1, 1); // Top-left 2 x 2, indexes are inclusive

    return 0;
}"#;

pub const CUSTOMIZE_DEFAULT_EXTENT: &str = r#"// Import appropriate tags for customization
#include <mpp/utility/config.hpp>

namespace mpp::customize
{
    // Customizations have to happen BEFORE ANY INSTANTIATION, they are not picked up after.
    // mpp::customize is the namespace users are free to open for customizing.

    [[nodiscard]] constexpr std::size_t tag_invoke(matrix_rows_extent_tag, customize_tag)
    {
        return 10;
    }

    [[nodiscard]] constexpr std::size_t tag_invoke(matrix_columns_extent_tag, customize_tag)
    {
        return 10;
    }
} // namespace mpp::customize

#include <mpp/matrix.hpp>

int main()
{
    auto m = mpp::matrix<int>{}; // Picks up the new default extent
    auto r = m.rows_extent(); // 10
    auto c = m.columns_extent(); // 10

    return 0;
}"#;

pub const CUSTOMIZE_UTILITIES: &str = r#"#include <mpp/matrix.hpp>

namespace ns
{
    enum class vec_types
    {
        vec
    };

    struct vec {};

    [[nodiscard]] auto tag_invoke(mpp::type_t, vec) -> vec_types
    {
        return vec_types::vec;
    }

    [[nodiscard]] auto tag_invoke(mpp::determinant_t, vec) -> int
    {
        return 2000;
    }

    // More customization points exist, these two show the library picking them up
}

int main()
{
    auto v = ns::vec{};
    auto t = mpp::type(v); // vec_types::vec
    auto d = mpp::determinant(v); // 2000

    return 0;
}"#;

pub const CUSTOM_ITERATORS: &str = r#"#include <mpp/matrix.hpp>

int main()
{
    auto matrix = mpp::matrix<int>{ { 1, 2 }, { 3, 4 } };
    auto begin = matrix.begin();

    // Iterators can also move by whole rows
    begin.move_forward_rows(1);
    auto val = *begin; // 3

    begin.move_backward_rows(1);
    ++begin;
    val = *begin; // 2

    return 0;
}"#;

pub const COMPARISONS: &str = r#"#include <mpp/matrix.hpp>
#include <mpp/utility/comparator.hpp> // mpp::compare_three_way_equivalent
#include <mpp/utility/comparison.hpp>

int main()
{
    // Matrices of different value types can't be compared

    // Both are deduced as dynamic 2x2 matrices
    const auto left = mpp::matrix<int>{ { 1, 2 }, { 3, 4 } };
    const auto right = mpp::matrix<int>{ { 1, 2 }, { 3, 5 } };

    // Comparing dimensions
    const auto [row_order_1, column_order_1] = mpp::size_compare(left, right, true, true);
    // row_order_1 -> std::partial_ordering::equivalent
    // column_order_1 -> std::partial_ordering::equivalent

    const auto [row_order_2, column_order_2] = mpp::size_compare(left, right, true, false); // Rows only
    // row_order_2 -> std::partial_ordering::equivalent
    // column_order_2 -> std::partial_ordering::unordered (not compared)

    // Comparing elements, the ordering type follows the value type's spaceship operator
    const auto ordering_1 = mpp::elements_compare(left, right);
    // ordering_1 -> std::strong_ordering::less

    const auto left_f = mpp::matrix<float>{ { 41.F / 99.F } };
    const auto right_f = mpp::matrix<float>{ { 41.F / 99.F } };
    const auto ordering_2 = mpp::elements_compare(left_f, right_f, mpp::compare_three_way_equivalent);
    // compare_three_way_equivalent handles floating points
    // ordering_2 -> std::partial_ordering::equivalent

    return 0;
}"#;

/// Every snippet by the name the pages refer to it with.
pub const ALL: &[(&str, &str)] = &[
    ("init", INIT),
    ("kinds", KINDS),
    ("operations", OPERATIONS),
    ("customize_default_extent", CUSTOMIZE_DEFAULT_EXTENT),
    ("customize_utilities", CUSTOMIZE_UTILITIES),
    ("custom_iterators", CUSTOM_ITERATORS),
    ("comparisons", COMPARISONS),
];

pub fn get(name: &str) -> Option<&'static str> {
    ALL.iter().find(|(n, _)| *n == name).map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_by_name() {
        assert_eq!(get("init"), Some(INIT));
        assert!(get("operations").unwrap().contains("mpp::determinant"));
        assert_eq!(get("missing"), None);
    }

    #[test]
    fn every_snippet_is_a_complete_program() {
        for (name, code) in ALL {
            assert!(code.contains("#include <"), "{name}");
            assert!(code.contains("int main()"), "{name}");
            assert!(code.trim_end().ends_with('}'), "{name}");
        }
    }

    #[test]
    fn customization_snippets_are_listed() {
        for name in ["customize_default_extent", "customize_utilities", "custom_iterators", "comparisons"] {
            assert!(get(name).is_some(), "{name}");
        }
        assert!(get("customize_default_extent").unwrap().contains("matrix_rows_extent_tag"));
        assert!(get("comparisons").unwrap().contains("mpp::elements_compare"));
        assert_eq!(ALL.len(), 7);
    }
}
