use super::*;
use std::fmt;

/// A quotient of two polynomials. The denominator is never the zero polynomial.
#[derive(Clone, Debug, PartialEq)]
pub struct RationalFunction<C> {
    numerator: Polynomial<C>,
    denominator: Polynomial<C>,
}

impl<C> RationalFunction<C> {
    pub fn numerator(&self) -> &Polynomial<C> {
        &self.numerator
    }

    pub fn denominator(&self) -> &Polynomial<C> {
        &self.denominator
    }
}

impl<C: fmt::Display> fmt::Display for RationalFunction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) / ({})", self.numerator, self.denominator)
    }
}

/// The field of fractions of polynomials with coefficients in the ring `A`.
///
/// Results are not reduced: no common factors are cancelled, so compare them with
/// [`RationalFunctionSpace::equals`] rather than `==`.
#[derive(Clone, Debug)]
pub struct RationalFunctionSpace<C, A> {
    polynomials: PolynomialSpace<C, A>,
}

impl<C, A> RationalFunctionSpace<C, A>
where
    C: Clone + PartialEq,
    A: Ring<C>,
{
    pub fn new(ring: A) -> Self {
        Self {
            polynomials: PolynomialSpace::new(ring),
        }
    }

    /// The space of numerators and denominators.
    pub fn polynomials(&self) -> &PolynomialSpace<C, A> {
        &self.polynomials
    }

    /// Creates `numerator / denominator`, failing for a zero denominator.
    pub fn rational(&self, numerator: Polynomial<C>, denominator: Polynomial<C>) -> Result<RationalFunction<C>> {
        if self.polynomials.is_zero(&denominator) {
            return Err(FunctionsError::Arithmetic(
                "Rational function with a zero denominator".to_string(),
            ));
        }

        Ok(RationalFunction {
            numerator,
            denominator,
        })
    }

    /// Embeds a polynomial as `p / 1`.
    pub fn from_polynomial(&self, numerator: Polynomial<C>) -> RationalFunction<C> {
        RationalFunction {
            numerator,
            denominator: self.polynomials.one(),
        }
    }

    pub fn zero(&self) -> RationalFunction<C> {
        self.from_polynomial(self.polynomials.zero())
    }

    pub fn one(&self) -> RationalFunction<C> {
        self.from_polynomial(self.polynomials.one())
    }

    pub fn is_zero(&self, rf: &RationalFunction<C>) -> bool {
        self.polynomials.is_zero(&rf.numerator)
    }

    /// Cross multiplication equality: `a/b == c/d` iff `a*d == c*b`.
    pub fn equals(&self, left: &RationalFunction<C>, right: &RationalFunction<C>) -> bool {
        let p = &self.polynomials;
        p.equals(
            &p.mul(&left.numerator, &right.denominator),
            &p.mul(&right.numerator, &left.denominator),
        )
    }

    pub fn neg(&self, rf: &RationalFunction<C>) -> RationalFunction<C> {
        RationalFunction {
            numerator: self.polynomials.neg(&rf.numerator),
            denominator: rf.denominator.clone(),
        }
    }

    pub fn add(&self, left: &RationalFunction<C>, right: &RationalFunction<C>) -> RationalFunction<C> {
        let p = &self.polynomials;
        RationalFunction {
            numerator: p.add(
                &p.mul(&left.numerator, &right.denominator),
                &p.mul(&right.numerator, &left.denominator),
            ),
            denominator: p.mul(&left.denominator, &right.denominator),
        }
    }

    pub fn sub(&self, left: &RationalFunction<C>, right: &RationalFunction<C>) -> RationalFunction<C> {
        self.add(left, &self.neg(right))
    }

    pub fn mul(&self, left: &RationalFunction<C>, right: &RationalFunction<C>) -> RationalFunction<C> {
        let p = &self.polynomials;
        RationalFunction {
            numerator: p.mul(&left.numerator, &right.numerator),
            denominator: p.mul(&left.denominator, &right.denominator),
        }
    }

    /// Divides `left` by `right`, failing when `right` is zero.
    pub fn div(&self, left: &RationalFunction<C>, right: &RationalFunction<C>) -> Result<RationalFunction<C>> {
        if self.is_zero(right) {
            return Err(FunctionsError::Arithmetic("Division by a zero rational function".to_string()));
        }

        let p = &self.polynomials;
        Ok(RationalFunction {
            numerator: p.mul(&left.numerator, &right.denominator),
            denominator: p.mul(&left.denominator, &right.numerator),
        })
    }

    pub fn add_polynomial(&self, rf: &RationalFunction<C>, poly: &Polynomial<C>) -> RationalFunction<C> {
        let p = &self.polynomials;
        RationalFunction {
            numerator: p.add(&rf.numerator, &p.mul(poly, &rf.denominator)),
            denominator: rf.denominator.clone(),
        }
    }

    pub fn mul_polynomial(&self, rf: &RationalFunction<C>, poly: &Polynomial<C>) -> RationalFunction<C> {
        RationalFunction {
            numerator: self.polynomials.mul(&rf.numerator, poly),
            denominator: rf.denominator.clone(),
        }
    }
}

impl<C, A> RationalFunctionSpace<C, A>
where
    C: Clone + PartialEq,
    A: Field<C>,
{
    /// Evaluates the rational function at `argument`, failing when the denominator vanishes there.
    pub fn substitute(&self, rf: &RationalFunction<C>, argument: &C) -> Result<C> {
        let p = &self.polynomials;
        let denominator = p.substitute(&rf.denominator, argument);
        if p.ring().is_zero(&denominator) {
            return Err(FunctionsError::Arithmetic(
                "Denominator evaluates to zero".to_string(),
            ));
        }

        Ok(p.ring().div(&p.substitute(&rf.numerator, argument), &denominator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nd_tensor::{Float64Field, Int32Ring};

    fn p(coefficients: &[i32]) -> Polynomial<i32> {
        Polynomial::new(coefficients.to_vec())
    }

    #[test]
    fn test_zero_denominator_is_rejected() {
        let space = RationalFunctionSpace::new(Int32Ring);
        assert!(matches!(
            space.rational(p(&[1]), p(&[0, 0])),
            Err(FunctionsError::Arithmetic(_))
        ));
        assert!(space.rational(p(&[1]), p(&[0, 1])).is_ok());
    }

    #[test]
    fn test_arithmetic() -> Result<()> {
        let space = RationalFunctionSpace::new(Int32Ring);
        // 1 / x and 1 / (x + 1)
        let a = space.rational(p(&[1]), p(&[0, 1]))?;
        let b = space.rational(p(&[1]), p(&[1, 1]))?;

        // (2x + 1) / (x^2 + x)
        let sum = space.add(&a, &b);
        assert!(space.equals(&sum, &space.rational(p(&[1, 2]), p(&[0, 1, 1]))?));

        let difference = space.sub(&a, &b);
        assert!(space.equals(&difference, &space.rational(p(&[1]), p(&[0, 1, 1]))?));

        let product = space.mul(&a, &b);
        assert!(space.equals(&product, &space.rational(p(&[1]), p(&[0, 1, 1]))?));

        let quotient = space.div(&a, &b)?;
        assert!(space.equals(&quotient, &space.rational(p(&[1, 1]), p(&[0, 1]))?));

        assert!(space.is_zero(&space.add(&a, &space.neg(&a))));
        assert!(space.equals(&space.mul(&a, &space.one()), &a));
        assert!(matches!(
            space.div(&a, &space.zero()),
            Err(FunctionsError::Arithmetic(_))
        ));

        Ok(())
    }

    #[test]
    fn test_polynomial_operands() -> Result<()> {
        let space = RationalFunctionSpace::new(Int32Ring);
        let a = space.rational(p(&[1]), p(&[0, 1]))?;

        // 1/x + x = (1 + x^2) / x
        let sum = space.add_polynomial(&a, &p(&[0, 1]));
        assert!(space.equals(&sum, &space.rational(p(&[1, 0, 1]), p(&[0, 1]))?));

        // 1/x * x = 1
        assert!(space.equals(&space.mul_polynomial(&a, &p(&[0, 1])), &space.one()));
        assert!(space.equals(&space.from_polynomial(p(&[2])), &space.rational(p(&[4]), p(&[2]))?));

        Ok(())
    }

    #[test]
    fn test_substitute() -> Result<()> {
        let space = RationalFunctionSpace::new(Float64Field);
        // (x + 1) / (x - 2)
        let rf = space.rational(
            Polynomial::new(vec![1.0, 1.0]),
            Polynomial::new(vec![-2.0, 1.0]),
        )?;

        assert_eq!(space.substitute(&rf, &4.0)?, 2.5);
        assert!(matches!(
            space.substitute(&rf, &2.0),
            Err(FunctionsError::Arithmetic(_))
        ));
        assert_eq!(rf.to_string(), "(Polynomial[1, 1]) / (Polynomial[-2, 1])");

        Ok(())
    }
}
