use super::*;
use std::fmt;

/// A univariate polynomial stored as its coefficients, the constant term first.
///
/// Trailing zero coefficients are allowed and ignored by [`PolynomialSpace::degree`] and
/// [`PolynomialSpace::equals`]. An empty coefficient list is the zero polynomial.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial<C> {
    coefficients: Vec<C>,
}

impl<C> Polynomial<C> {
    pub fn new(coefficients: Vec<C>) -> Self {
        Self { coefficients }
    }

    /// Creates a polynomial from coefficients listed from the highest power down.
    pub fn from_reversed(mut coefficients: Vec<C>) -> Self {
        coefficients.reverse();
        Self { coefficients }
    }

    pub fn constant(value: C) -> Self {
        Self {
            coefficients: vec![value],
        }
    }

    pub fn coefficients(&self) -> &[C] {
        &self.coefficients
    }
}

impl<C: fmt::Display> fmt::Display for Polynomial<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polynomial[")?;
        for (i, c) in self.coefficients.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "]")
    }
}

/// The ring of polynomials with coefficients in the ring `A`.
#[derive(Clone, Debug, Default)]
pub struct PolynomialSpace<C, A> {
    ring: A,
    _coefficient: std::marker::PhantomData<fn() -> C>,
}

impl<C, A> PolynomialSpace<C, A>
where
    C: Clone + PartialEq,
    A: Ring<C>,
{
    pub fn new(ring: A) -> Self {
        Self {
            ring,
            _coefficient: std::marker::PhantomData,
        }
    }

    /// The coefficient ring.
    pub fn ring(&self) -> &A {
        &self.ring
    }

    pub fn zero(&self) -> Polynomial<C> {
        Polynomial::new(Vec::new())
    }

    pub fn one(&self) -> Polynomial<C> {
        Polynomial::constant(self.ring.one())
    }

    /// Index of the highest non-zero coefficient, `None` for the zero polynomial.
    pub fn degree(&self, p: &Polynomial<C>) -> Option<usize> {
        p.coefficients.iter().rposition(|c| !self.ring.is_zero(c))
    }

    pub fn is_zero(&self, p: &Polynomial<C>) -> bool {
        self.degree(p).is_none()
    }

    pub fn is_one(&self, p: &Polynomial<C>) -> bool {
        self.is_constant_with(p, |ring, c| ring.is_one(c))
    }

    pub fn is_minus_one(&self, p: &Polynomial<C>) -> bool {
        self.is_constant_with(p, |ring, c| ring.is_one(&ring.neg(c)))
    }

    /// Compares coefficients up to the degree, so trailing zeros make no difference.
    pub fn equals(&self, left: &Polynomial<C>, right: &Polynomial<C>) -> bool {
        let degree = self.degree(left);
        degree == self.degree(right)
            && degree.is_none_or(|d| left.coefficients[..=d] == right.coefficients[..=d])
    }

    pub fn neg(&self, p: &Polynomial<C>) -> Polynomial<C> {
        Polynomial::new(p.coefficients.iter().map(|c| self.ring.neg(c)).collect())
    }

    pub fn add(&self, left: &Polynomial<C>, right: &Polynomial<C>) -> Polynomial<C> {
        self.combine(left, right, |ring, a, b| match (a, b) {
            (Some(a), Some(b)) => ring.add(a, b),
            (Some(a), None) => a.clone(),
            (None, Some(b)) => b.clone(),
            (None, None) => ring.zero(),
        })
    }

    pub fn sub(&self, left: &Polynomial<C>, right: &Polynomial<C>) -> Polynomial<C> {
        self.combine(left, right, |ring, a, b| match (a, b) {
            (Some(a), Some(b)) => ring.sub(a, b),
            (Some(a), None) => a.clone(),
            (None, Some(b)) => ring.neg(b),
            (None, None) => ring.zero(),
        })
    }

    pub fn mul(&self, left: &Polynomial<C>, right: &Polynomial<C>) -> Polynomial<C> {
        let (Some(dl), Some(dr)) = (self.degree(left), self.degree(right)) else {
            return self.zero();
        };

        let coefficients = (0..=dl + dr)
            .map(|d| {
                (d.saturating_sub(dr)..=dl.min(d)).fold(self.ring.zero(), |acc, i| {
                    let term = self.ring.mul(&left.coefficients[i], &right.coefficients[d - i]);
                    self.ring.add(&acc, &term)
                })
            })
            .collect();

        Polynomial::new(coefficients)
    }

    pub fn add_constant(&self, p: &Polynomial<C>, value: &C) -> Polynomial<C> {
        self.map_constant_term(p, |ring, c| ring.add(c, value))
    }

    pub fn sub_constant(&self, p: &Polynomial<C>, value: &C) -> Polynomial<C> {
        self.map_constant_term(p, |ring, c| ring.sub(c, value))
    }

    pub fn mul_constant(&self, p: &Polynomial<C>, value: &C) -> Polynomial<C> {
        Polynomial::new(p.coefficients.iter().map(|c| self.ring.mul(c, value)).collect())
    }

    pub fn add_int(&self, p: &Polynomial<C>, n: i64) -> Polynomial<C> {
        if n == 0 {
            return p.clone();
        }
        self.add_constant(p, &self.ring.multiply_by_int(&self.ring.one(), n))
    }

    pub fn sub_int(&self, p: &Polynomial<C>, n: i64) -> Polynomial<C> {
        if n == 0 {
            return p.clone();
        }
        self.sub_constant(p, &self.ring.multiply_by_int(&self.ring.one(), n))
    }

    pub fn mul_int(&self, p: &Polynomial<C>, n: i64) -> Polynomial<C> {
        if n == 0 {
            return self.zero();
        }
        Polynomial::new(
            p.coefficients
                .iter()
                .map(|c| self.ring.multiply_by_int(c, n))
                .collect(),
        )
    }

    /// The constant value of a polynomial of degree 0, zero for the zero polynomial.
    pub fn as_constant_or_none(&self, p: &Polynomial<C>) -> Option<C> {
        match self.degree(p) {
            None => Some(self.ring.zero()),
            Some(0) => Some(p.coefficients[0].clone()),
            Some(_) => None,
        }
    }

    pub fn as_constant(&self, p: &Polynomial<C>) -> Result<C> {
        self.as_constant_or_none(p).ok_or_else(|| {
            FunctionsError::NotConstant(format!(
                "Can not represent polynomial of degree {:?} as a constant",
                self.degree(p)
            ))
        })
    }

    /// Evaluates the polynomial at `argument` with Horner's scheme.
    pub fn substitute(&self, p: &Polynomial<C>, argument: &C) -> C {
        p.coefficients.iter().rev().fold(self.ring.zero(), |acc, c| {
            self.ring.add(&self.ring.mul(&acc, argument), c)
        })
    }

    /// Composes `p` with `argument`, giving `p(argument(x))`.
    pub fn substitute_polynomial(&self, p: &Polynomial<C>, argument: &Polynomial<C>) -> Polynomial<C> {
        p.coefficients.iter().rev().fold(self.zero(), |acc, c| {
            self.add_constant(&self.mul(&acc, argument), c)
        })
    }

    /// Returns `p` as a closure evaluating it.
    pub fn as_function<'a>(&'a self, p: &'a Polynomial<C>) -> impl Fn(&C) -> C + 'a {
        move |argument| self.substitute(p, argument)
    }

    fn is_constant_with(&self, p: &Polynomial<C>, check: impl Fn(&A, &C) -> bool) -> bool {
        match p.coefficients.split_first() {
            Some((first, rest)) => check(&self.ring, first) && rest.iter().all(|c| self.ring.is_zero(c)),
            None => false,
        }
    }

    fn combine(
        &self,
        left: &Polynomial<C>,
        right: &Polynomial<C>,
        op: impl Fn(&A, Option<&C>, Option<&C>) -> C,
    ) -> Polynomial<C> {
        let len = left.coefficients.len().max(right.coefficients.len());
        Polynomial::new(
            (0..len)
                .map(|i| op(&self.ring, left.coefficients.get(i), right.coefficients.get(i)))
                .collect(),
        )
    }

    fn map_constant_term(&self, p: &Polynomial<C>, op: impl Fn(&A, &C) -> C) -> Polynomial<C> {
        let mut coefficients = p.coefficients.clone();
        match coefficients.first_mut() {
            Some(first) => *first = op(&self.ring, first),
            None => coefficients.push(op(&self.ring, &self.ring.zero())),
        }
        Polynomial::new(coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nd_tensor::{Float64Field, Int64Ring};
    use proptest::prelude::*;

    fn space() -> PolynomialSpace<i64, Int64Ring> {
        PolynomialSpace::new(Int64Ring)
    }

    fn p(coefficients: &[i64]) -> Polynomial<i64> {
        Polynomial::new(coefficients.to_vec())
    }

    #[test]
    fn test_degree_and_predicates() {
        let space = space();
        assert_eq!(space.degree(&p(&[1, 2, 3])), Some(2));
        assert_eq!(space.degree(&p(&[1, 2, 0, 0])), Some(1));
        assert_eq!(space.degree(&p(&[0, 0])), None);
        assert_eq!(space.degree(&space.zero()), None);

        assert!(space.is_zero(&p(&[0, 0])));
        assert!(space.is_one(&space.one()));
        assert!(space.is_one(&p(&[1, 0])));
        assert!(!space.is_one(&p(&[1, 1])));
        assert!(space.is_minus_one(&p(&[-1])));
        assert!(!space.is_minus_one(&space.zero()));
    }

    #[test]
    fn test_ring_operations() {
        let space = space();
        let a = p(&[1, 2]);
        let b = p(&[-1, 0, 3]);

        assert_eq!(space.add(&a, &b), p(&[0, 2, 3]));
        assert_eq!(space.sub(&a, &b), p(&[2, 2, -3]));
        assert_eq!(space.neg(&a), p(&[-1, -2]));
        // (1 + 2x)(-1 + 3x^2) = -1 - 2x + 3x^2 + 6x^3
        assert_eq!(space.mul(&a, &b), p(&[-1, -2, 3, 6]));
        assert!(space.is_zero(&space.mul(&a, &space.zero())));
    }

    #[test]
    fn test_constant_and_int_operations() {
        let space = space();
        let a = p(&[1, 2]);

        assert_eq!(space.add_constant(&a, &4), p(&[5, 2]));
        assert_eq!(space.sub_constant(&a, &4), p(&[-3, 2]));
        assert_eq!(space.mul_constant(&a, &3), p(&[3, 6]));
        assert_eq!(space.add_constant(&space.zero(), &7), p(&[7]));

        assert_eq!(space.add_int(&a, 2), p(&[3, 2]));
        assert_eq!(space.sub_int(&a, -2), p(&[3, 2]));
        assert_eq!(space.mul_int(&a, -3), p(&[-3, -6]));
        assert!(space.is_zero(&space.mul_int(&a, 0)));
    }

    #[test]
    fn test_equals_ignores_trailing_zeros() {
        let space = space();
        assert!(space.equals(&p(&[1, 2]), &p(&[1, 2, 0])));
        assert!(space.equals(&space.zero(), &p(&[0])));
        assert!(!space.equals(&p(&[1, 2]), &p(&[1, 3])));
    }

    #[test]
    fn test_constants() {
        let space = space();
        assert_eq!(space.as_constant_or_none(&p(&[5, 0])), Some(5));
        assert_eq!(space.as_constant_or_none(&space.zero()), Some(0));
        assert_eq!(space.as_constant_or_none(&p(&[5, 1])), None);
        assert_eq!(space.as_constant(&p(&[4])), Ok(4));
        assert!(matches!(
            space.as_constant(&p(&[0, 1])),
            Err(FunctionsError::NotConstant(_))
        ));
    }

    #[test]
    fn test_substitute() {
        let space = space();
        // 3x^2 + 2x + 1
        let poly = Polynomial::from_reversed(vec![3, 2, 1]);
        assert_eq!(poly, p(&[1, 2, 3]));
        assert_eq!(space.substitute(&poly, &2), 17);
        assert_eq!(space.substitute(&space.zero(), &2), 0);

        let f = space.as_function(&poly);
        assert_eq!(f(&-1), 2);

        // (x + 1) substituted into 3x^2 + 2x + 1 is 3x^2 + 8x + 6
        let composed = space.substitute_polynomial(&poly, &p(&[1, 1]));
        assert_eq!(composed, p(&[6, 8, 3]));
    }

    #[test]
    fn test_float_coefficients() {
        let space = PolynomialSpace::new(Float64Field);
        let poly = Polynomial::new(vec![0.5, 0.0, 2.0]);
        assert_eq!(space.substitute(&poly, &0.5), 1.0);
        assert_eq!(space.mul_int(&poly, 2), Polynomial::new(vec![1.0, 0.0, 4.0]));
        assert_eq!(poly.to_string(), "Polynomial[0.5, 0, 2]");
    }

    fn poly_strategy() -> impl Strategy<Value = Polynomial<i64>> {
        prop::collection::vec(-20i64..20, 0..5).prop_map(Polynomial::new)
    }

    proptest! {
        #[test]
        fn prop_ring_laws(a in poly_strategy(), b in poly_strategy(), c in poly_strategy()) {
            let space = space();

            prop_assert!(space.equals(&space.add(&a, &b), &space.add(&b, &a)));
            prop_assert!(space.equals(&space.mul(&a, &b), &space.mul(&b, &a)));
            prop_assert!(space.equals(
                &space.mul(&a, &space.add(&b, &c)),
                &space.add(&space.mul(&a, &b), &space.mul(&a, &c)),
            ));
            prop_assert!(space.is_zero(&space.sub(&a, &a)));
            prop_assert!(space.equals(&space.mul(&a, &space.one()), &a));
        }

        #[test]
        fn prop_substitution_is_a_homomorphism(a in poly_strategy(), b in poly_strategy(), x in -5i64..5) {
            let space = space();
            prop_assert_eq!(
                space.substitute(&space.mul(&a, &b), &x),
                space.substitute(&a, &x) * space.substitute(&b, &x)
            );
            prop_assert_eq!(
                space.substitute(&space.add(&a, &b), &x),
                space.substitute(&a, &x) + space.substitute(&b, &x)
            );
        }
    }
}
